//! Code-review summarizer agent.
//!
//! Obtains the diff of the last commit, splits it into word-count chunks
//! when it is too large, summarizes each chunk with an independent model
//! call, and consolidates the partial summaries into one final review.

pub mod chunker;

pub use chunker::{split_words, DiffChunk};

use crate::envelope::{AgentInput, AgentOutput};
use crate::git;
use crate::llm::{ChatMessage, LanguageModel};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Settings for a review run.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// Maximum words per diff chunk.
    pub chunk_words: usize,
    /// Repository directory (None for the current directory).
    pub repo_dir: Option<PathBuf>,
    /// Temperature for review generation.
    pub temperature: f32,
    /// Show a progress bar while chunk summaries are in flight.
    pub show_progress: bool,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            chunk_words: 4000,
            repo_dir: None,
            temperature: 0.1,
            show_progress: false,
        }
    }
}

/// Agent that reviews the last git commit with a language model.
pub struct CodeReviewer {
    llm: Arc<dyn LanguageModel>,
    options: ReviewOptions,
}

impl CodeReviewer {
    /// Create a reviewer backed by the given model.
    pub fn new(llm: Arc<dyn LanguageModel>, options: ReviewOptions) -> Self {
        Self { llm, options }
    }

    /// Run one review and fold any failure into the output envelope.
    pub async fn forward(&self, input: &AgentInput) -> AgentOutput {
        // Prefer a diff piped by the runner; fall back to git.
        let diff = match input.payload_text() {
            Some(text) => text.to_string(),
            None => match git::show_head(self.options.repo_dir.as_deref()).await {
                Ok(diff) => diff,
                Err(e) => return AgentOutput::err(&input.id, e.to_string()),
            },
        };

        if diff.trim().is_empty() {
            return AgentOutput::ok(
                &input.id,
                json!({ "summary": "No changes found in the last commit." }),
            );
        }

        let chunks = split_words(&diff, self.options.chunk_words);
        debug!("Diff split into {} chunk(s)", chunks.len());

        let review = if chunks.len() == 1 {
            self.review_whole(&chunks[0].text).await
        } else {
            self.review_chunked(&chunks).await
        };

        match review {
            Ok(content) => AgentOutput::ok(
                &input.id,
                json!({ "content": content, "chunks": chunks.len() }),
            ),
            Err(message) => AgentOutput::err(&input.id, message),
        }
    }

    /// Review a diff that fits in a single model call.
    async fn review_whole(&self, diff: &str) -> Result<String, String> {
        let prompt = review_prompt(diff);

        self.llm
            .complete(&[ChatMessage::user(prompt)], Some(self.options.temperature))
            .await
            .map_err(|e| format!("Failed to get review from LLM: {e}"))
    }

    /// Fan out one summary call per chunk, then consolidate.
    ///
    /// All chunk calls run concurrently; the first failed chunk (by index)
    /// aborts the whole review and completed sibling summaries are dropped.
    async fn review_chunked(&self, chunks: &[DiffChunk]) -> Result<String, String> {
        let total = chunks.len();
        info!("Summarizing {} diff chunks concurrently", total);

        let progress = if self.options.show_progress {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let calls = chunks.iter().map(|chunk| {
            let llm = Arc::clone(&self.llm);
            let prompt = chunk_prompt(&chunk.text, chunk.index, total);
            let temperature = self.options.temperature;
            let progress = progress.clone();
            let index = chunk.index;

            async move {
                let result = llm
                    .complete(&[ChatMessage::user(prompt)], Some(temperature))
                    .await;
                progress.inc(1);
                (index, result)
            }
        });

        let results = join_all(calls).await;
        progress.finish_and_clear();

        let mut summaries = vec![String::new(); total];
        for (index, result) in results {
            match result {
                Ok(summary) => summaries[index] = summary,
                Err(e) => {
                    return Err(format!(
                        "Failed to summarize chunk {} of {}: {e}",
                        index + 1,
                        total
                    ));
                }
            }
        }

        let prompt = consolidate_prompt(&summaries);
        self.llm
            .complete(&[ChatMessage::user(prompt)], Some(self.options.temperature))
            .await
            .map_err(|e| format!("Failed to consolidate review: {e}"))
    }
}

/// Prompt for a diff reviewed in one call.
fn review_prompt(diff: &str) -> String {
    format!(
        "Please act as a senior software engineer and provide a code review \
         for the following git diff.\n\n\
         Provide a concise summary of the changes and identify any potential \
         issues, such as bugs, style inconsistencies, or areas for improvement.\n\n\
         Here is the diff:\n\n```diff\n{diff}\n```\n"
    )
}

/// Prompt for one chunk of a larger diff.
fn chunk_prompt(text: &str, index: usize, total: usize) -> String {
    format!(
        "You are reviewing part {part} of {total} of a large git diff. \
         Summarize the changes in this part and note any potential issues, \
         such as bugs, style inconsistencies, or areas for improvement. \
         Other parts are reviewed separately, so stay within this part.\n\n\
         Here is part {part} of the diff:\n\n```diff\n{text}\n```\n",
        part = index + 1,
    )
}

/// Prompt that folds the ordered partial summaries into one review.
fn consolidate_prompt(summaries: &[String]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "A large git diff was reviewed in parts. Below are the partial \
         reviews, in order. Merge them into a single coherent code review: \
         a concise summary of the overall change followed by the notable \
         issues. Do not mention the parts themselves.\n\n",
    );

    let total = summaries.len();
    for (i, summary) in summaries.iter().enumerate() {
        prompt.push_str(&format!("### Part {} of {}\n\n{}\n\n", i + 1, total, summary));
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockLm;

    fn input_with_diff(diff: &str) -> AgentInput {
        let mut input = AgentInput::new();
        input.set_str("input", diff);
        input
    }

    fn reviewer(mock: &Arc<MockLm>, chunk_words: usize) -> CodeReviewer {
        CodeReviewer::new(
            Arc::clone(mock) as Arc<dyn LanguageModel>,
            ReviewOptions {
                chunk_words,
                ..ReviewOptions::default()
            },
        )
    }

    #[tokio::test]
    async fn test_empty_diff_skips_the_model() {
        let mock = Arc::new(MockLm::replying("should not be called"));
        let output = reviewer(&mock, 100).forward(&input_with_diff("")).await;

        assert!(!output.is_err());
        let result = output.result.unwrap();
        assert_eq!(
            result["summary"].as_str().unwrap(),
            "No changes found in the last commit."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_chunk_bypasses_consolidation() {
        let mock = Arc::new(MockLm::replying("looks solid"));
        let output = reviewer(&mock, 100)
            .forward(&input_with_diff("diff --git a/x b/x\n+added line"))
            .await;

        assert!(!output.is_err());
        let result = output.result.unwrap();
        assert_eq!(result["content"].as_str().unwrap(), "looks solid");
        assert_eq!(result["chunks"].as_u64().unwrap(), 1);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_chunked_review_fans_out_and_consolidates() {
        let mock = Arc::new(MockLm::replying("partial summary"));
        // 6 words with a 2-word limit: 3 chunk calls + 1 consolidation.
        let output = reviewer(&mock, 2)
            .forward(&input_with_diff("one two three four five six"))
            .await;

        assert!(!output.is_err());
        let result = output.result.unwrap();
        assert_eq!(result["chunks"].as_u64().unwrap(), 3);
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_failed_chunk_aborts_and_names_the_chunk() {
        // The marker lands in the third of five chunks.
        let mock = Arc::new(MockLm::failing_on("MARKER", "partial summary"));
        let diff = "a b c d MARKER f g h i j";
        let output = reviewer(&mock, 2).forward(&input_with_diff(diff)).await;

        assert!(output.is_err());
        let error = output.error.unwrap();
        assert!(error.contains("chunk 3 of 5"), "error was: {error}");
    }

    #[tokio::test]
    async fn test_whitespace_only_diff_is_empty() {
        let mock = Arc::new(MockLm::replying("unused"));
        let output = reviewer(&mock, 100)
            .forward(&input_with_diff("  \n\t "))
            .await;

        assert!(!output.is_err());
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_consolidate_prompt_labels_parts_in_order() {
        let summaries = vec!["first".to_string(), "second".to_string()];
        let prompt = consolidate_prompt(&summaries);

        let part_one = prompt.find("### Part 1 of 2").unwrap();
        let part_two = prompt.find("### Part 2 of 2").unwrap();
        assert!(part_one < part_two);
        assert!(prompt.contains("first"));
        assert!(prompt.contains("second"));
    }

    #[test]
    fn test_review_prompt_fences_the_diff() {
        let prompt = review_prompt("+let x = 1;");
        assert!(prompt.contains("```diff\n+let x = 1;\n```"));
        assert!(prompt.contains("senior software engineer"));
    }
}
