//! Promptdesk - LLM-backed code review and document Q&A agents
//!
//! A CLI hosting two small agents built on a shared input/output
//! envelope and an Ollama chat client: `review` summarizes the last
//! git commit (chunking oversized diffs), `docqa` answers questions
//! about a document.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Agent or runtime error

mod cli;
mod config;
mod docqa;
mod envelope;
mod git;
mod llm;
mod review;

use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use config::Config;
use envelope::{AgentInput, AgentOutput};
use llm::{LanguageModel, OllamaClient, OllamaConfig};
use std::io::{IsTerminal, Read};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Promptdesk v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let output = run_agent(&args).await?;
    let failed = output.is_err();

    render_output(&output, args.format)?;

    if failed {
        std::process::exit(1);
    }

    Ok(())
}

/// Handle init-config: generate a default .promptdesk.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".promptdesk.toml");

    if path.exists() {
        eprintln!("⚠️  .promptdesk.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .promptdesk.toml")?;

    println!("✅ Created .promptdesk.toml with default settings.");
    println!("   Edit it to customize model, chunk size, and timeouts.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Build the input envelope and dispatch to the selected agent.
async fn run_agent(args: &Args) -> Result<AgentOutput> {
    // Load configuration
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    let llm: Arc<dyn LanguageModel> = Arc::new(OllamaClient::new(OllamaConfig {
        base_url: config.model.ollama_url.clone(),
        model: config.model.name.clone(),
        timeout_seconds: config.model.timeout_seconds,
    })?);

    let mut input = AgentInput::new();
    if let Some(text) = read_piped_stdin()? {
        input.set_str("input", text);
    }

    debug!("Input envelope id: {}", input.id);

    match &args.command {
        Command::Review(review_args) => {
            let options = review::ReviewOptions {
                chunk_words: config.review.chunk_words,
                repo_dir: review_args.repo.clone(),
                temperature: config.model.temperature,
                show_progress: !args.quiet && args.format == OutputFormat::Text,
            };

            let reviewer = review::CodeReviewer::new(llm, options);
            Ok(reviewer.forward(&input).await)
        }
        Command::Docqa(docqa_args) => {
            if let Some(question) = docqa_args.question.as_deref() {
                input.set_str("question", question);
            }
            if let Some(file) = docqa_args.file.as_deref() {
                input.set_str("file", file);
            }

            let options = docqa::DocQaOptions {
                temperature: config.docqa.temperature,
                fetch_timeout_seconds: config.docqa.fetch_timeout_seconds,
            };

            let agent = docqa::DocQa::new(llm, options)?;
            Ok(agent.forward(&input).await)
        }
        Command::InitConfig => {
            anyhow::bail!("init-config is handled before agent dispatch")
        }
    }
}

/// Read piped stdin, if any.
///
/// Returns `None` when stdin is a terminal or the pipe is empty.
fn read_piped_stdin() -> Result<Option<String>> {
    let mut stdin = std::io::stdin();

    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .context("Failed to read piped stdin")?;

    if buffer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

/// Render the output envelope to stdout/stderr.
fn render_output(output: &AgentOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(output)?);
        }
        OutputFormat::Text => {
            if let Some(ref error) = output.error {
                eprintln!("❌ Error: {}", error);
            } else if let Some(ref result) = output.result {
                if let Some(content) = result.get("content").and_then(|v| v.as_str()) {
                    println!("{}", content);
                } else if let Some(summary) = result.get("summary").and_then(|v| v.as_str()) {
                    println!("{}", summary);
                } else {
                    println!("{}", serde_json::to_string_pretty(result)?);
                }
            }
        }
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .promptdesk.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
