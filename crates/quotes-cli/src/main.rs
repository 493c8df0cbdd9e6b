//! Quotes CLI
//!
//! Command-line interface for Quotes - a local quote collection with
//! categories, import/export and background sync.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quotes_core::storage::recovery_hint;
use quotes_core::{Config, Store};

mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Quotes - a local quote collection with remote sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides QUOTES_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Show a random quote
    Random,
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Category
        category: String,
    },
    /// List quotes, optionally filtered by category
    #[command(alias = "ls")]
    List {
        /// Category to show ("all" for every quote); defaults to the saved filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List categories
    Categories,
    /// Export all quotes to quotes.json
    Export {
        /// Directory to write quotes.json into (defaults to the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON file, appending to the collection
    Import {
        /// JSON file containing an array of quotes
        file: PathBuf,
    },
    /// Fetch quotes from the sync server once
    Sync,
    /// Show status (storage location, counts, sync settings)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, sync_url, sync_enabled, sync_interval_secs,
        /// sync_timeout_secs, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = recovery_hint(&e) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // TUI sets up its own file logging
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        let config = Config::load_with_cli_override(config_path)
            .context("Failed to load configuration")?;
        return tui::run(config).await;
    }

    init_cli_logging();

    let Some(command) = cli.command else {
        return Ok(());
    };

    // Commands that don't need the store
    if let Commands::Config { command } = command {
        return handle_config_command(command, config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let mut store = Store::open_with_config(config)?;

    match command {
        Commands::Tui | Commands::Config { .. } => Ok(()), // Handled above
        Commands::Random => commands::quote::random(&mut store, &output),
        Commands::Add { text, category } => {
            commands::quote::add(&mut store, &text, &category, &output)
        }
        Commands::List { category } => commands::quote::list(&store, category, &output),
        Commands::Categories => commands::category::list(&store, &output),
        Commands::Export { output: dir } => commands::transfer::export(&store, dir, &output),
        Commands::Import { file } => commands::transfer::import(&mut store, &file, &output),
        Commands::Sync => commands::sync::sync(store, &output).await,
        Commands::Status => commands::status::show(&store, &output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging for one-shot commands
///
/// Logs to stderr at `warn` unless QUOTES_LOG says otherwise.
fn init_cli_logging() {
    let env_filter = EnvFilter::try_from_env("QUOTES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
