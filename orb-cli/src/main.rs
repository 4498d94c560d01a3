// SPDX-License-Identifier: AGPL-3.0-or-later
//! Orbital Files CLI
//!
//! Browse and manage files across every configured provider.

mod commands;
mod config;
mod shell;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "orb")]
#[command(author, version, about = "Orbital Files - one file browser for every storage provider", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured providers
    Providers,

    /// List a directory of a provider
    #[command(alias = "dir")]
    Ls {
        /// Provider name
        provider: String,

        /// Directory inside the provider (defaults to its root)
        #[arg(default_value = "")]
        path: String,

        /// Show all entries including hidden files and symlinks
        #[arg(short, long)]
        all: bool,

        /// Sort key: name, size or modified
        #[arg(short, long, default_value = "name")]
        sort: String,

        /// Descending order
        #[arg(short, long)]
        desc: bool,

        /// Human-readable sizes
        #[arg(short = 'H', long)]
        human: bool,
    },

    /// Register a local directory as a provider
    AddNative {
        /// Provider name
        id: String,

        /// Directory to browse
        root: PathBuf,
    },

    /// Interactive browsing shell
    Shell,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Providers => commands::providers(&config).await,
        Commands::Ls { provider, path, all, sort, desc, human } => {
            commands::ls(&config, &provider, &path, all, &sort, desc, human).await
        }
        Commands::AddNative { id, root } => commands::add_native(&config, &id, &root).await,
        Commands::Shell => shell::run(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
