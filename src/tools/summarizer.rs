use anyhow::Result;
use crate::llm::{ChatClient, ChatRequest};
use super::Tool;

/// Condenses a page's raw content to roughly 200 words using an LLM.
pub struct Summarizer {
    chat: ChatClient,
    temperature: f32,
    top_p: f32,
}

impl Summarizer {
    pub fn new(chat: ChatClient, temperature: f32, top_p: f32) -> Self {
        Self { chat, temperature, top_p }
    }

    fn system_prompt(raw_content: &str) -> String {
        format!("Summarize the following content in 200 words: {}", raw_content)
    }
}

#[async_trait::async_trait]
impl Tool for Summarizer {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "summarizer"
    }

    async fn run(&self, raw_content: String) -> Result<String> {
        log::debug!("Summarizer: condensing {} chars", raw_content.len());

        let result = self.chat.chat(ChatRequest {
            system_prompt: Self::system_prompt(&raw_content),
            temperature: self.temperature,
            top_p: self.top_p,
        }).await?;

        log::debug!("Summarizer: {} → {} chars", raw_content.len(), result.len());

        Ok(result)
    }
}
