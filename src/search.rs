use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MAX_RESULTS: u32 = 5;
pub const DEFAULT_FILTER_SCORE: f64 = 0.5;

/// Rejected query parameters.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("query text is empty")]
    EmptyText,
    #[error("max_results must be at least 1")]
    ZeroMaxResults,
    #[error("filter_score must be within [0, 1], got {0}")]
    FilterScoreOutOfRange(f64),
}

/// One search invocation and its post-processing options.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    text: String,
    max_results: u32,
    filter_score: f64,
    summarize: bool,
    want_suggested_answer: bool,
}

impl SearchQuery {
    pub fn new(
        text: impl Into<String>,
        max_results: u32,
        filter_score: f64,
        summarize: bool,
        want_suggested_answer: bool,
    ) -> Result<Self, QueryError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QueryError::EmptyText);
        }
        if max_results == 0 {
            return Err(QueryError::ZeroMaxResults);
        }
        if !(0.0..=1.0).contains(&filter_score) {
            return Err(QueryError::FilterScoreOutOfRange(filter_score));
        }

        Ok(Self {
            text,
            max_results,
            filter_score,
            summarize,
            want_suggested_answer,
        })
    }

    /// Query with default options.
    #[cfg(test)]
    pub fn simple(text: impl Into<String>) -> Result<Self, QueryError> {
        Self::new(text, DEFAULT_MAX_RESULTS, DEFAULT_FILTER_SCORE, false, false)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn filter_score(&self) -> f64 {
        self.filter_score
    }

    pub fn summarize(&self) -> bool {
        self.summarize
    }

    pub fn want_suggested_answer(&self) -> bool {
        self.want_suggested_answer
    }
}

/// A single ranked hit returned by the search provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub score: f64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub raw_content: Option<String>,
}

/// Provider response: the echoed query, ranked results and an optional
/// synthesized answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default, rename = "answer")]
    pub suggested_answer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_validation() {
        assert!(SearchQuery::simple("capital of France").is_ok());
        assert_eq!(
            SearchQuery::new("q", 0, 0.5, false, false),
            Err(QueryError::ZeroMaxResults)
        );
        assert_eq!(
            SearchQuery::new("q", 3, 1.5, false, false),
            Err(QueryError::FilterScoreOutOfRange(1.5))
        );
        assert_eq!(SearchQuery::simple("   "), Err(QueryError::EmptyText));
        assert!(SearchQuery::new("q", 1, f64::NAN, false, false).is_err());
    }

    #[test]
    fn test_query_defaults() {
        let query = SearchQuery::simple("rust").unwrap();
        assert_eq!(query.max_results(), 5);
        assert_eq!(query.filter_score(), 0.5);
        assert!(!query.summarize());
        assert!(!query.want_suggested_answer());
    }

    #[test]
    fn test_response_deserialize_with_nulls() {
        let json = r#"{
            "query": "capital of France",
            "answer": "Paris",
            "images": [],
            "response_time": 1.2,
            "results": [
                {"title": "Paris", "url": "https://a.example", "score": 0.9,
                 "content": "Paris is the capital.", "raw_content": null},
                {"url": "https://b.example", "score": 0.3}
            ]
        }"#;

        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.suggested_answer.as_deref(), Some("Paris"));
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].raw_content, None);
        assert_eq!(response.results[0].title.as_deref(), Some("Paris"));
        assert_eq!(response.results[1].content, None);
        assert_eq!(response.results[1].score, 0.3);
    }

    #[test]
    fn test_response_without_answer() {
        let json = r#"{"query": "q", "results": []}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.suggested_answer.is_none());
        assert!(response.results.is_empty());
    }
}
