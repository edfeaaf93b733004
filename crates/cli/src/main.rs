//! Lore CLI
//!
//! Main entry point for the lore command-line tool.
//! Provides commands for question answering over a local PDF library.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, IngestCommand, StatsCommand};
use lore_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Lore CLI - question answering over a local PDF library
#[derive(Parser, Debug)]
#[command(name = "lore")]
#[command(about = "Question answering over a local PDF library", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "LORE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the source PDFs
    #[arg(short, long, global = true, env = "LORE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to the SQLite index database
    #[arg(short, long, global = true, env = "LORE_INDEX_PATH")]
    index_path: Option<PathBuf>,

    /// Collection to ingest into and query
    #[arg(long, global = true, env = "LORE_COLLECTION")]
    collection: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest PDFs into the vector index
    Ingest(IngestCommand),

    /// Interactive question-answering session
    Chat(ChatCommand),

    /// Show index statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.data_dir,
        cli.index_path,
        cli.collection,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    config.validate()?;

    tracing::info!("Lore CLI starting");
    tracing::debug!("Data dir: {:?}", config.data_dir);
    tracing::debug!("Index: {:?}", config.index_path);
    tracing::debug!("Collection: {}", config.collection);

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Chat(_) => "chat",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
