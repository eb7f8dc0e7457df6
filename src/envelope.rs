//! Input/output envelopes shared by all agents.
//!
//! Every agent invocation receives an [`AgentInput`] and produces an
//! [`AgentOutput`]. Failures are carried in the output envelope as a
//! descriptive error string instead of being propagated as a fault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Payload keys probed (in order) for inline text piped by the runner.
const TEXT_KEYS: [&str; 5] = ["input", "stdin", "content", "data", "text"];

/// A single agent invocation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInput {
    /// Unique identifier for this invocation.
    pub id: String,
    /// Free-form request payload (question, file reference, piped text, ...).
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl AgentInput {
    /// Create a new input with a generated id and an empty payload.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            payload: Map::new(),
        }
    }

    /// Set a string payload entry.
    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.payload
            .insert(key.to_string(), Value::String(value.into()));
    }

    /// Get a string payload entry, if present.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Inline text passed by the runner (piped stdin and friends).
    ///
    /// Probes the conventional keys in order and returns the first string
    /// value found, even if empty.
    pub fn payload_text(&self) -> Option<&str> {
        TEXT_KEYS.iter().find_map(|key| self.payload_str(key))
    }
}

impl Default for AgentInput {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of an agent invocation.
///
/// Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutput {
    /// Id of the input this output answers.
    pub input_id: String,
    /// Structured result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Descriptive error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When this output was produced.
    pub created_at: DateTime<Utc>,
}

impl AgentOutput {
    /// Create a successful output.
    pub fn ok(input_id: impl Into<String>, result: Value) -> Self {
        Self {
            input_id: input_id.into(),
            result: Some(result),
            error: None,
            created_at: Utc::now(),
        }
    }

    /// Create a failed output.
    pub fn err(input_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            input_id: input_id.into(),
            result: None,
            error: Some(error.into()),
            created_at: Utc::now(),
        }
    }

    /// Whether this output carries an error.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}
