use anyhow::{Context, Result};

/// Shared HTTP client for OpenAI-compatible chat completion calls.
pub struct ChatClient {
    pub endpoint: String,
    pub model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// Parameters for a single chat completion.
pub struct ChatRequest {
    pub system_prompt: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl ChatClient {
    pub fn new(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            model,
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt }
            ],
            "temperature": request.temperature,
            "top_p": request.top_p,
        })
    }

    /// Send a chat request and return the first choice's message content.
    pub async fn chat(&self, request: ChatRequest) -> Result<String> {
        let body = self.build_body(&request);

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.endpoint.trim_end_matches('/')))
            .json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to chat endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &error_text));
        }

        let response_json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse chat response")?;

        extract_content(&response_json)
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    anyhow::anyhow!("Chat API error ({}): {}", status, body)
}

fn extract_content(response_json: &serde_json::Value) -> Result<String> {
    let content = response_json["choices"][0]["message"]["content"]
        .as_str()
        .context("No content in chat response")?
        .to_string();

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let json = serde_json::json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "short" } }]
        });
        assert_eq!(extract_content(&json).unwrap(), "short");

        let empty = serde_json::json!({ "choices": [] });
        assert!(extract_content(&empty).is_err());
    }

    #[test]
    fn test_api_error_carries_status_and_body() {
        let err = api_error(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached"}}"#,
        );
        let message = err.to_string();
        assert!(message.starts_with("Chat API error (429 Too Many Requests)"));
        assert!(message.contains("Rate limit reached"));
    }

    #[test]
    fn test_build_body_system_only() {
        let client = ChatClient::new("http://localhost".into(), "gpt-4o-mini".into(), None);
        let body = client.build_body(&ChatRequest {
            system_prompt: "Summarize this".to_string(),
            temperature: 0.0,
            top_p: 1.0,
        });

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "Summarize this");
    }
}
