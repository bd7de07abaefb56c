//! faqdesk CLI
//!
//! Main entry point for the faqdesk command-line tool.
//! Provides hybrid lexical + vector search over a local knowledge base.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AddCommand, DeleteCommand, RefreshCommand, SearchCommand, StatsCommand};
use faqdesk_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// faqdesk - knowledge base retrieval for support teams
#[derive(Parser, Debug)]
#[command(name = "faqdesk")]
#[command(about = "Hybrid lexical + vector search over a local knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "FAQDESK_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "FAQDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the record source file
    #[arg(long, global = true, env = "FAQDESK_RECORDS")]
    records: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Embedding provider (trigram, ollama)
    #[arg(short, long, global = true, env = "FAQDESK_PROVIDER")]
    provider: Option<String>,

    /// Embedding model identifier
    #[arg(short, long, global = true, env = "FAQDESK_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the knowledge base
    Search(SearchCommand),

    /// Add a question/answer entry
    Add(AddCommand),

    /// Delete an entry by position
    Delete(DeleteCommand),

    /// Rebuild the knowledge base from the source of truth
    Refresh(RefreshCommand),

    /// Show knowledge base statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.provider,
        cli.model,
        cli.records,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Records: {:?}", config.records_file());

    // Ensure .faqdesk directory exists
    config.ensure_faqdesk_dir()?;

    let command_name = match &cli.command {
        Commands::Search(_) => "search",
        Commands::Add(_) => "add",
        Commands::Delete(_) => "delete",
        Commands::Refresh(_) => "refresh",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Add(cmd) => cmd.execute(&config).await,
        Commands::Delete(cmd) => cmd.execute(&config).await,
        Commands::Refresh(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result.map_err(Into::into)
}
