//! Shared completion-provider client
//!
//! HTTP client for an OpenAI-compatible chat completions API (Groq by
//! default). The provider is treated as an opaque, possibly-unreliable
//! collaborator: this module only transports text and never interprets it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::model::ProviderConfig;

/// Sampling temperature for risk scoring. Kept low so repeated analyses of
/// the same message score consistently.
const ANALYSIS_TEMPERATURE: f32 = 0.2;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse completion response: {0}")]
    Parse(String),
}

/// Seam for requesting a completion from a provider.
///
/// Lets tests substitute a stub backend and assert call counts.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Request a completion for the given system prompt and user message,
    /// returning the raw text of the first choice.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}

/// Client for an OpenAI-compatible chat completions API
pub struct GroqClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatRequestMessage<'a>>,
}

#[derive(Serialize)]
struct ChatRequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

// Every level defaults so a missing choice, message or content at any
// nesting depth yields an empty completion instead of a parse error.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Default, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatResponseMessage,
}

#[derive(Default, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl GroqClient {
    /// Create a new client from the provider configuration
    pub fn new(api_key: &str, config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl CompletionBackend for GroqClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = ChatRequest {
            model: &self.model,
            temperature: ANALYSIS_TEMPERATURE,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatRequestMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        };

        tracing::debug!(url = %url, model = %self.model, "Requesting chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status { status, body });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Parse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        tracing::debug!(
            model = %self.model,
            content_length = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_extraction() {
        let raw = r#"{"choices":[{"message":{"content":"{\"risk_score\":10}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        assert_eq!(content, r#"{"risk_score":10}"#);
    }

    #[test]
    fn test_missing_content_defaults_to_empty() {
        // content absent at each nesting level
        for raw in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
        ] {
            let response: ChatResponse = serde_json::from_str(raw).unwrap();
            let content = response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default();
            assert_eq!(content, "", "raw: {}", raw);
        }
    }

    #[tokio::test]
    #[ignore] // Requires network access and GROQ_API_KEY
    async fn test_live_completion() {
        let api_key = std::env::var("GROQ_API_KEY").expect("GROQ_API_KEY not set");
        let client = GroqClient::new(&api_key, &ProviderConfig::default());
        let result = client
            .complete("Reply with the single word: ok", "ping")
            .await;
        assert!(result.is_ok());
        assert!(!result.unwrap().is_empty());
    }
}
