mod config;
mod llm;
mod processor;
mod search;
mod tools;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, ConfigSource};
use processor::SearchResultProcessor;
use search::SearchQuery;

/// Search the web and print a cleaned, filtered digest of the results.
#[derive(Parser, Debug)]
#[command(name = "websearch", version, about)]
struct Cli {
    /// Search query
    query: String,

    /// Maximum number of results to request from the provider
    #[arg(short = 'n', long)]
    max_results: Option<u32>,

    /// Minimum relevance score a result needs to be kept (0.0 - 1.0)
    #[arg(short, long)]
    filter_score: Option<f64>,

    /// Replace result content with an LLM summary of the page
    #[arg(short, long)]
    summarize: bool,

    /// Append the provider's suggested answer
    #[arg(short = 'a', long)]
    suggested_answer: bool,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Load configuration
    let (config, source) = Config::load(&cli.config)?;

    // Initialize logging, RUST_LOG wins over the configured level
    pretty_env_logger::formatted_builder()
        .parse_filters(
            &std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        )
        .init();

    match source {
        ConfigSource::File => log::info!("Configuration loaded from {}", cli.config),
        ConfigSource::Defaults => {
            log::warn!("Config file {} not found, using defaults", cli.config)
        }
    }

    let query = SearchQuery::new(
        cli.query,
        cli.max_results.unwrap_or(config.search.max_results),
        cli.filter_score.unwrap_or(config.search.filter_score),
        cli.summarize,
        cli.suggested_answer,
    )
    .context("Invalid search parameters")?;

    let processor = SearchResultProcessor::new(&config);

    match processor.process(&query).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            log::error!("Search failed: {:#}", e);
            Err(e)
        }
    }
}
