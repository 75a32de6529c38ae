//! Chat model abstraction and OpenAI-backed client.
//!
//! Defines the [`ChatModel`] trait, the [`Invocation`] record observed by
//! audit sinks, and the [`OpenAiChat`] client for the chat completions
//! endpoint. Retry and timeout behavior matches the embedding client:
//! 429/5xx and network errors retry with exponential backoff, other 4xx
//! fail immediately.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::config::ChatConfig;
use crate::error::{Error, Result};

const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// One message in a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The structured inputs of one model call.
///
/// This is what audit observers see: the component name being invoked and
/// every message about to be sent.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Identifier of the invoked model (e.g. `"gpt-4o-mini"`).
    pub name: String,
    pub messages: Vec<ChatMessage>,
}

/// A model that turns a message list into a reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the model identifier (e.g. `"gpt-4o-mini"`).
    fn name(&self) -> &str;

    /// Send the messages and return the assistant's reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Chat client for the OpenAI `POST /v1/chat/completions` endpoint.
///
/// The API key is injected at construction; the client never reads the
/// process environment.
pub struct OpenAiChat {
    model: String,
    api_key: String,
    base_url: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OpenAiChat {
    pub fn new(config: &ChatConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            max_retries: config.max_retries,
            client,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await.map_err(|e| {
                            Error::Model(format!("invalid chat response: {}", e))
                        })?;
                        return parse_completion_response(&json);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(Error::Model(format!(
                            "chat API error {}: {}",
                            status, body_text
                        )));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    return Err(Error::Model(format!(
                        "chat API error {}: {}",
                        status, body_text
                    )));
                }
                Err(e) => {
                    last_err = Some(Error::Model(format!("chat request failed: {}", e)));
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Model("chat failed after retries".to_string())))
    }
}

/// Extract the reply text from a chat completions response.
fn parse_completion_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            Error::Model("invalid chat response: missing choices[0].message.content".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion_response() {
        let json = serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Paris." } }
            ]
        });
        assert_eq!(parse_completion_response(&json).unwrap(), "Paris.");
    }

    #[test]
    fn test_parse_completion_response_missing_choices() {
        let json = serde_json::json!({ "error": { "message": "bad request" } });
        let err = parse_completion_response(&json).unwrap_err();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn test_user_message_shape() {
        let message = ChatMessage::user("hello");
        assert_eq!(message.role, "user");
        assert_eq!(message.content, "hello");
    }
}
