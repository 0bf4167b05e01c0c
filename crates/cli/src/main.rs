//! Docent CLI
//!
//! Main entry point for the docent command-line tool.
//! Provides conversational question answering over a private document
//! corpus.

mod commands;
mod setup;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand};
use docent_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Docent - conversational QA over your document corpus
#[derive(Parser, Debug)]
#[command(name = "docent")]
#[command(about = "Conversational QA over a private document corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "DOCENT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (openai, claude, ollama)
    #[arg(short, long, global = true, env = "DOCENT_PROVIDER")]
    provider: Option<String>,

    /// Completion model identifier
    #[arg(short, long, global = true, env = "DOCENT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a single question against the document corpus
    Ask(AskCommand),

    /// Interactive chat session with conversation history
    Chat(ChatCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Docent CLI starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);
    tracing::debug!("Search index: {}", config.search.index);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
