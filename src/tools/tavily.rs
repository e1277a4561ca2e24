use anyhow::Result;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::search::{SearchQuery, SearchResponse};
use super::Tool;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("TAVILY_API_KEY is not set")]
    MissingApiKey,
    #[error("search request failed")]
    Request(#[from] reqwest::Error),
    #[error("search provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse search response")]
    Parse(#[from] serde_json::Error),
}

/// Runs queries against the Tavily search API.
pub struct TavilySearch {
    endpoint: String,
    api_key: Option<String>,
    search_depth: String,
    client: reqwest::Client,
}

impl TavilySearch {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            search_depth: config.search_depth.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, query: &SearchQuery) -> serde_json::Value {
        serde_json::json!({
            "query": query.text(),
            "max_results": query.max_results(),
            "search_depth": self.search_depth,
            "include_answer": true,
            "include_raw_content": true,
            "include_images": false,
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::MissingApiKey)?;

        let response = self
            .client
            .post(format!("{}/search", self.endpoint.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&self.request_body(query))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}

fn parse_response(text: &str) -> Result<SearchResponse, SearchError> {
    Ok(serde_json::from_str(text)?)
}

#[async_trait::async_trait]
impl Tool for TavilySearch {
    type Input = SearchQuery;
    type Output = SearchResponse;

    fn name(&self) -> &str {
        "tavily_search"
    }

    async fn run(&self, query: SearchQuery) -> Result<SearchResponse> {
        log::info!(
            "TavilySearch: querying \"{}\" (max_results={}, depth={})",
            query.text(),
            query.max_results(),
            self.search_depth
        );

        let response = self.search(&query).await?;

        log::info!("TavilySearch: {} result(s) returned", response.results.len());
        Ok(response)
    }
}
