//! Ollama chat API client.
//!
//! Talks to `POST {base}/api/chat` with streaming disabled and maps
//! transport failures to descriptive [`LmError`] variants.

use crate::llm::{ChatMessage, LanguageModel, LmError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Connection settings for the Ollama endpoint.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server, e.g. `http://localhost:11434`.
    pub base_url: String,
    /// Model name, e.g. `llama3.2:latest`.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Client for the Ollama chat API.
pub struct OllamaClient {
    config: OllamaConfig,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OllamaClient {
    /// Create a client with the given connection settings.
    pub fn new(config: OllamaConfig) -> Result<Self, LmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LmError::Transport(e.to_string()))?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String, LmError> {
        let url = format!("{}/api/chat", self.config.base_url);

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            options: ChatOptions { temperature },
        };

        debug!(
            "Sending chat request with {} messages to {}",
            messages.len(),
            url
        );

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LmError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    LmError::Connect(self.config.base_url.clone())
                } else {
                    LmError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LmError::Api { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LmError::Malformed(e.to_string()))?;

        Ok(chat_response.message.content)
    }
}
