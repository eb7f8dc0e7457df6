//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.promptdesk.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Code reviewer settings.
    #[serde(default)]
    pub review: ReviewConfig,

    /// Document Q&A settings.
    #[serde(default)]
    pub docqa: DocqaConfig,
}

/// LLM model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Default model name.
    #[serde(default = "default_model")]
    pub name: String,

    /// Ollama API URL.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,

    /// Temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            ollama_url: default_ollama_url(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_timeout() -> u64 {
    300
}

/// Code reviewer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Maximum words per diff chunk.
    #[serde(default = "default_chunk_words")]
    pub chunk_words: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            chunk_words: default_chunk_words(),
        }
    }
}

fn default_chunk_words() -> usize {
    4000
}

/// Document Q&A settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocqaConfig {
    /// Temperature for answer generation.
    #[serde(default = "default_docqa_temperature")]
    pub temperature: f32,

    /// Timeout for fetching remote documents, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
}

impl Default for DocqaConfig {
    fn default() -> Self {
        Self {
            temperature: default_docqa_temperature(),
            fetch_timeout_seconds: default_fetch_timeout(),
        }
    }
}

fn default_docqa_temperature() -> f32 {
    0.2
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".promptdesk.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Model settings - always override since they have defaults in CLI
        self.model.name = args.model.clone();
        self.model.ollama_url = args.ollama_url.clone();

        // Timeout - only override if explicitly provided via CLI
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = timeout;
        }

        // Per-command settings - only override if explicitly provided
        match &args.command {
            crate::cli::Command::Review(review) => {
                if let Some(chunk_words) = review.chunk_words {
                    self.review.chunk_words = chunk_words;
                }
                if let Some(temperature) = review.temperature {
                    self.model.temperature = temperature;
                }
            }
            crate::cli::Command::Docqa(docqa) => {
                if let Some(temperature) = docqa.temperature {
                    self.docqa.temperature = temperature;
                }
            }
            crate::cli::Command::InitConfig => {}
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.name, "llama3.2:latest");
        assert_eq!(config.model.ollama_url, "http://localhost:11434");
        assert_eq!(config.review.chunk_words, 4000);
        assert_eq!(config.docqa.temperature, 0.2);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[model]
name = "qwen2.5:14b"
temperature = 0.3

[review]
chunk_words = 2000

[docqa]
fetch_timeout_seconds = 10
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.model.name, "qwen2.5:14b");
        assert_eq!(config.model.temperature, 0.3);
        // Unset fields keep their defaults.
        assert_eq!(config.model.timeout_seconds, 300);
        assert_eq!(config.review.chunk_words, 2000);
        assert_eq!(config.docqa.fetch_timeout_seconds, 10);
        assert_eq!(config.docqa.temperature, 0.2);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[model]"));
        assert!(toml_str.contains("[review]"));
        assert!(toml_str.contains("[docqa]"));
    }
}
