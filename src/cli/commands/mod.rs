//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod import;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use jobimport::config::load_settings;

#[derive(Parser)]
#[command(name = "jobimport")]
#[command(about = "Import structured job postings from LinkedIn, Indeed, Glassdoor and careers pages")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Import a job posting and print the result as JSON
    Import {
        /// Posting URL
        url: String,
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Start the HTTP import endpoint
    Serve {
        /// Address to bind: "3030", "0.0.0.0" or "0.0.0.0:3030" (defaults to config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show the resolved configuration
    Config,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, config) = load_settings(cli.config.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Import { url, pretty } => import::cmd_import(&settings, &url, pretty).await,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Config => config_cmd::cmd_config_show(&settings, &config),
    }
}
