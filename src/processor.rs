use anyhow::Result;
use futures_util::{stream, StreamExt, TryStreamExt};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::Config;
use crate::llm::ChatClient;
use crate::search::{SearchQuery, SearchResponse};
use crate::tools::{Summarizer, TavilySearch, Tool};

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

fn is_layout_control(c: char) -> bool {
    matches!(c, '\n' | '\t' | '\r')
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

fn is_misc_symbol(c: char) -> bool {
    ('\u{2600}'..='\u{26FF}').contains(&c)
}

fn is_dingbat(c: char) -> bool {
    ('\u{2700}'..='\u{27BF}').contains(&c)
}

fn is_emoji(c: char) -> bool {
    ('\u{1F300}'..='\u{1F9FF}').contains(&c)
}

fn is_allowed(c: char) -> bool {
    is_printable_ascii(c)
        || is_layout_control(c)
        || is_cjk_ideograph(c)
        || is_misc_symbol(c)
        || is_dingbat(c)
        || is_emoji(c)
}

static NEWLINE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());

/// Strip characters outside the allow-list, then squeeze runs of three or
/// more newlines down to two and runs of spaces down to one.
///
/// Filtering happens first, so `"\n\u{7}\n\n"` collapses to `"\n\n"`.
pub fn clean(text: &str) -> String {
    let filtered: String = text.chars().filter(|&c| is_allowed(c)).collect();
    let collapsed = NEWLINE_RUN_RE.replace_all(&filtered, "\n\n");
    SPACE_RUN_RE.replace_all(&collapsed, " ").into_owned()
}

/// Drop every result scoring below `min_score`, keeping provider order.
pub fn filter(response: &mut SearchResponse, min_score: f64) {
    response.results.retain(|result| result.score >= min_score);
}

/// Clean `content` and `raw_content` of every result; absent fields stay absent.
pub fn clean_results(response: &mut SearchResponse) {
    for result in &mut response.results {
        result.content = result.content.as_deref().map(clean);
        result.raw_content = result.raw_content.as_deref().map(clean);
    }
}

/// Render the response as a plain-text block.
pub fn format(response: &SearchResponse, query: &SearchQuery) -> String {
    let mut lines = vec![
        format!("Query: {}\n", response.query),
        "Sources:\n".to_string(),
    ];

    for result in &response.results {
        lines.push(format!("Relevance Score: {}", result.score));
        lines.push(format!("URL: {}", result.url));
        lines.push(format!(
            "Content: {}\n",
            result.content.as_deref().unwrap_or("N/A")
        ));
    }

    if query.want_suggested_answer() {
        lines.push(format!(
            "Suggested Answer: {}",
            response.suggested_answer.as_deref().unwrap_or("N/A")
        ));
    }

    lines.join("\n")
}

/// Runs a search and turns the provider response into a formatted digest.
pub struct SearchResultProcessor<S, G> {
    search: S,
    summarizer: G,
    concurrency: usize,
}

impl SearchResultProcessor<TavilySearch, Summarizer> {
    pub fn new(config: &Config) -> Self {
        let chat = ChatClient::new(
            config.summarizer.endpoint.clone(),
            config.summarizer.model.clone(),
            config.summarizer.api_key.clone(),
        );

        Self::with_tools(
            TavilySearch::new(&config.search),
            Summarizer::new(chat, config.summarizer.temperature, config.summarizer.top_p),
            config.summarizer.concurrency,
        )
    }
}

impl<S, G> SearchResultProcessor<S, G>
where
    S: Tool<Input = SearchQuery, Output = SearchResponse>,
    G: Tool<Input = String, Output = String>,
{
    pub fn with_tools(search: S, summarizer: G, concurrency: usize) -> Self {
        Self {
            search,
            summarizer,
            concurrency: concurrency.max(1),
        }
    }

    /// Replace each result's content with a summary of its raw content.
    ///
    /// Only results that carry raw content are sent to the summarizer; the
    /// rest keep their content untouched. Summaries are matched back by
    /// result index, so completion order never affects pairing.
    pub async fn summarize(&self, response: &mut SearchResponse) -> Result<()> {
        let pending: Vec<(usize, String)> = response
            .results
            .iter()
            .enumerate()
            .filter_map(|(idx, result)| result.raw_content.clone().map(|raw| (idx, raw)))
            .collect();

        log::info!(
            "Processor: summarizing {} of {} result(s) with {}",
            pending.len(),
            response.results.len(),
            self.summarizer.name()
        );

        let summaries: Vec<(usize, String)> = stream::iter(pending)
            .map(|(idx, raw)| async move {
                self.summarizer.run(raw).await.map(|summary| (idx, summary))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        for (idx, summary) in summaries {
            response.results[idx].content = Some(summary);
        }

        Ok(())
    }

    /// Search, filter, clean, optionally summarize, then format.
    pub async fn process(&self, query: &SearchQuery) -> Result<String> {
        log::info!("Processor: Step 1 - Searching with {}", self.search.name());
        let mut response = self.search.run(query.clone()).await?;

        log::info!(
            "Processor: Step 2 - Filtering below score {}",
            query.filter_score()
        );
        let before = response.results.len();
        filter(&mut response, query.filter_score());
        log::info!(
            "Processor: kept {} of {} result(s)",
            response.results.len(),
            before
        );
        for result in &response.results {
            log::debug!(
                "Processor: keeping {} \"{}\" (score {})",
                result.url,
                result.title.as_deref().unwrap_or("untitled"),
                result.score
            );
        }

        log::info!("Processor: Step 3 - Cleaning content");
        clean_results(&mut response);

        if query.summarize() {
            log::info!("Processor: Step 4 - Summarizing content");
            self.summarize(&mut response).await?;
        }

        if query.want_suggested_answer() && response.suggested_answer.is_none() {
            log::warn!("Processor: suggested answer requested but provider returned none");
        }

        Ok(format(&response, query))
    }
}
