use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::search::{DEFAULT_FILTER_SCORE, DEFAULT_MAX_RESULTS};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub summarizer: SummarizerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub search_depth: String,
    pub max_results: u32,
    pub filter_score: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.tavily.com".to_string(),
            api_key: None,
            search_depth: "advanced".to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            filter_score: DEFAULT_FILTER_SCORE,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Maximum number of summarization requests in flight.
    pub concurrency: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            top_p: 1.0,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File,
    Defaults,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&content)
            .context("Failed to parse config file")?;

        config.apply_env();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigSource)> {
        let path = path.as_ref();
        if path.exists() {
            return Ok((Self::from_file(path)?, ConfigSource::File));
        }

        let mut config = Config::default();
        config.apply_env();
        Ok((config, ConfigSource::Defaults))
    }

    /// Override credentials with environment variables if set
    fn apply_env(&mut self) {
        if let Some(key) = env_key("TAVILY_API_KEY") {
            self.search.api_key = Some(key);
        }
        if let Some(key) = env_key("OPENAI_API_KEY") {
            self.summarizer.api_key = Some(key);
        }
    }
}

/// Read an environment variable, treating a blank value as unset.
fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let toml_str = r#"
            [search]
            endpoint = "http://localhost:8080"
            search_depth = "basic"
            max_results = 8
            filter_score = 0.7

            [summarizer]
            endpoint = "http://localhost:11434/v1"
            model = "llama3"
            temperature = 0.2
            top_p = 0.9
            concurrency = 2

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.endpoint, "http://localhost:8080");
        assert_eq!(config.search.max_results, 8);
        assert_eq!(config.search.filter_score, 0.7);
        assert_eq!(config.summarizer.model, "llama3");
        assert_eq!(config.summarizer.concurrency, 2);
        assert_eq!(config.logging.level, "debug");
        assert!(config.search.api_key.is_none());
    }

    #[test]
    fn test_config_missing_sections_use_defaults() {
        let toml_str = r#"
            [search]
            max_results = 3
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.search.search_depth, "advanced");
        assert_eq!(config.search.filter_score, 0.5);
        assert_eq!(config.summarizer.model, "gpt-4o-mini");
        assert_eq!(config.summarizer.temperature, 0.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = Config::load(dir.path().join("missing.toml")).unwrap();

        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.search.max_results, 5);
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\nmax_results = 9\n").unwrap();

        let (config, source) = Config::load(&path).unwrap();
        assert_eq!(source, ConfigSource::File);
        assert_eq!(config.search.max_results, 9);
    }

    #[test]
    fn test_env_key_ignores_blank_values() {
        std::env::set_var("WEBSEARCH_TEST_BLANK_KEY", "");
        assert_eq!(env_key("WEBSEARCH_TEST_BLANK_KEY"), None);

        std::env::set_var("WEBSEARCH_TEST_SET_KEY", "tvly-123");
        assert_eq!(env_key("WEBSEARCH_TEST_SET_KEY").as_deref(), Some("tvly-123"));

        assert_eq!(env_key("WEBSEARCH_TEST_UNSET_KEY"), None);
    }
}
