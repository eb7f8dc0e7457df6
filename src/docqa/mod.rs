//! Document Q&A agent.
//!
//! Answers a question about a document, or summarizes it when the
//! question is one of the summarize keywords.

pub mod source;

use crate::envelope::{AgentInput, AgentOutput};
use crate::llm::{ChatMessage, LanguageModel};
use serde_json::json;
use source::DocumentSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Settings for the Q&A agent.
#[derive(Debug, Clone)]
pub struct DocQaOptions {
    /// Temperature for answer generation.
    pub temperature: f32,
    /// Timeout for fetching remote documents, in seconds.
    pub fetch_timeout_seconds: u64,
}

impl Default for DocQaOptions {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            fetch_timeout_seconds: 30,
        }
    }
}

/// Agent that answers questions about a provided document.
pub struct DocQa {
    llm: Arc<dyn LanguageModel>,
    http: reqwest::Client,
    options: DocQaOptions,
}

impl DocQa {
    /// Create a Q&A agent backed by the given model.
    pub fn new(llm: Arc<dyn LanguageModel>, options: DocQaOptions) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.fetch_timeout_seconds))
            .build()?;

        Ok(Self { llm, http, options })
    }

    /// Run one question/answer round and fold any failure into the envelope.
    pub async fn forward(&self, input: &AgentInput) -> AgentOutput {
        let question = match input.payload_str("question") {
            Some(q) if !q.trim().is_empty() => q.to_string(),
            _ => {
                return AgentOutput::err(&input.id, "Missing required argument: -q/--question");
            }
        };

        // Text piped by the runner wins; fall back to the file reference.
        let mut document = input.payload_text().unwrap_or("").to_string();

        if document.trim().is_empty() {
            if let Some(reference) = input.payload_str("file") {
                let doc_source = DocumentSource::parse(reference);
                debug!("Resolving document source: {:?}", doc_source);

                match source::load(&doc_source, &self.http).await {
                    Ok(text) => document = text,
                    Err(e) => return AgentOutput::err(&input.id, e.to_string()),
                }
            }
        }

        if document.trim().is_empty() {
            return AgentOutput::err(
                &input.id,
                "No document provided. Use -f/--file or pipe content via stdin.",
            );
        }

        let prompt = build_prompt(&question, &document);

        match self
            .llm
            .complete(&[ChatMessage::user(prompt)], Some(self.options.temperature))
            .await
        {
            Ok(content) => AgentOutput::ok(&input.id, json!({ "content": content })),
            Err(e) => AgentOutput::err(&input.id, format!("Failed to get response from LLM: {e}")),
        }
    }
}

/// Keywords that turn a question into a summarization request.
const SUMMARIZE_KEYWORDS: [&str; 3] = ["summarize", "summary", "tl;dr"];

/// Build the Q&A prompt for a question and document.
fn build_prompt(question: &str, document: &str) -> String {
    let lowered = question.trim().to_lowercase();

    let instruction = if SUMMARIZE_KEYWORDS.contains(&lowered.as_str()) {
        "Provide a concise, accurate summary of the following document. \
         Capture the main points, key facts, and any actionable items."
    } else {
        "Answer the question based on the document."
    };

    format!("{instruction}\n\nDocument:\n```text\n{document}\n```\nQuestion: {question}\n\n")
}
