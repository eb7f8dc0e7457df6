//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Promptdesk - LLM-backed code review and document Q&A agents
///
/// Examples:
///   promptdesk review
///   promptdesk review --repo ./my-project --chunk-words 2000
///   cat notes.md | promptdesk docqa -q "what's this document about?"
///   promptdesk docqa -q summarize -f report.pdf
///   promptdesk docqa -q "who is the author?" -f https://example.com/paper.pdf
///   promptdesk init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Ollama model to use
    ///
    /// Can also be set via PROMPTDESK_MODEL env var or .promptdesk.toml config.
    #[arg(
        short,
        long,
        global = true,
        default_value = "llama3.2:latest",
        env = "PROMPTDESK_MODEL"
    )]
    pub model: String,

    /// Ollama API endpoint URL
    #[arg(
        long,
        global = true,
        default_value = "http://localhost:11434",
        env = "OLLAMA_URL"
    )]
    pub ollama_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .promptdesk.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available agent commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Review the last git commit with the model
    Review(ReviewArgs),
    /// Ask a question about a document, or summarize it
    Docqa(DocqaArgs),
    /// Generate a default .promptdesk.toml configuration file
    InitConfig,
}

/// Arguments for the code reviewer.
#[derive(clap::Args, Debug, Clone)]
pub struct ReviewArgs {
    /// Maximum words per diff chunk
    ///
    /// Larger diffs are split into chunks of this size, summarized
    /// independently, then consolidated into one review.
    #[arg(long, value_name = "WORDS")]
    pub chunk_words: Option<usize>,

    /// Repository directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Temperature for review generation (0.0 - 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,
}

/// Arguments for the document Q&A agent.
#[derive(clap::Args, Debug, Clone)]
pub struct DocqaArgs {
    /// Question to ask about the document
    ///
    /// "summarize", "summary" or "tl;dr" produce a summary instead.
    #[arg(short, long, value_name = "QUESTION")]
    pub question: Option<String>,

    /// Document to read: local path, file:// URI, or http(s):// URL
    #[arg(short, long, value_name = "PATH|URL")]
    pub file: Option<String>,

    /// Temperature for answer generation (0.0 - 1.0)
    #[arg(long)]
    pub temperature: Option<f32>,
}

/// Output format for the result envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text content (default)
    #[default]
    Text,
    /// The full output envelope as pretty JSON
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for init-config
        if matches!(self.command, Command::InitConfig) {
            return Ok(());
        }

        // Validate Ollama URL format
        if !self.ollama_url.starts_with("http://") && !self.ollama_url.starts_with("https://") {
            return Err("Ollama URL must start with 'http://' or 'https://'".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate timeout if provided
        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        match &self.command {
            Command::Review(review) => {
                if let Some(chunk_words) = review.chunk_words {
                    if chunk_words == 0 {
                        return Err("Chunk size must be at least 1 word".to_string());
                    }
                }
                if let Some(temperature) = review.temperature {
                    if !(0.0..=1.0).contains(&temperature) {
                        return Err("Temperature must be between 0.0 and 1.0".to_string());
                    }
                }
                if let Some(ref repo) = review.repo {
                    if !repo.is_dir() {
                        return Err(format!(
                            "Repository path is not a directory: {}",
                            repo.display()
                        ));
                    }
                }
            }
            Command::Docqa(docqa) => {
                if let Some(temperature) = docqa.temperature {
                    if !(0.0..=1.0).contains(&temperature) {
                        return Err("Temperature must be between 0.0 and 1.0".to_string());
                    }
                }
            }
            Command::InitConfig => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
