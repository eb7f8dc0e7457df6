//! Language model client abstraction.
//!
//! Agents talk to the model through the [`LanguageModel`] trait so that
//! tests can substitute a scripted double for the real Ollama client.

pub mod ollama;

pub use ollama::{OllamaClient, OllamaConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single message in a chat completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// A system-role message.
    #[allow(dead_code)] // Available for agents that carry a system prompt
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Errors from a model call.
#[derive(Debug, Error)]
pub enum LmError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to model endpoint at {0}")]
    Connect(String),

    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Malformed(String),

    #[error("request failed: {0}")]
    Transport(String),
}

/// A chat-completion capable language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Run one chat completion and return the response text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String, LmError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user = ChatMessage::user("hello");
        assert_eq!(user.role, "user");
        assert_eq!(user.content, "hello");

        let system = ChatMessage::system("be terse");
        assert_eq!(system.role, "system");
    }

    #[test]
    fn test_error_messages_name_the_endpoint() {
        let err = LmError::Connect("http://localhost:11434".to_string());
        assert!(err.to_string().contains("http://localhost:11434"));
    }

    #[tokio::test]
    async fn test_mock_counts_calls_and_fails_on_marker() {
        use testing::MockLm;

        let mock = MockLm::failing_on("BAD", "fine");
        let ok = mock
            .complete(&[ChatMessage::user("all good")], None)
            .await;
        assert_eq!(ok.unwrap(), "fine");

        let err = mock
            .complete(&[ChatMessage::user("this is BAD input")], None)
            .await;
        assert!(err.is_err());
        assert_eq!(mock.call_count(), 2);
    }
}
