pub mod summarizer;
pub mod tavily;

pub use summarizer::Summarizer;
pub use tavily::TavilySearch;

use anyhow::Result;

/// Tool trait for the external collaborators driven by the processor.
///
/// Not object-safe (associated types). The processor is generic over its
/// tools, which lets tests substitute in-memory fakes.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn name(&self) -> &str;
    async fn run(&self, input: Self::Input) -> Result<Self::Output>;
}
