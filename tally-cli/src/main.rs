//! # Tally CLI
//!
//! Operator command-line interface for the tally synchronization layer.
//!
//! This CLI provides commands for:
//! - Watching a live feed (all aggregates, printed periodically)
//! - Exporting a vote summary as CSV
//! - Showing build information

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod commands;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tally_feed::FeedConfig;

use commands::{export, watch};

/// Tally - live election-feed monitoring toolkit
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (yaml, toml, or json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Connect to a feed and print aggregate snapshots
    Watch(watch::WatchArgs),

    /// Export the development dataset as a CSV vote summary
    Export(export::ExportArgs),

    /// Show build information
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_feed_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Watch(args) => watch::run(args, config).await,
        Commands::Export(args) => export::run(&args),
        Commands::Info => {
            println!("tally {}", env!("CARGO_PKG_VERSION"));
            println!("Live election-feed synchronization toolkit");
            println!("default endpoint: {}", FeedConfig::default().endpoint);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .init();
}

fn load_feed_config(path: Option<&Path>) -> Result<FeedConfig> {
    match path {
        Some(path) => Ok(tally_core::config::load_config(path)?),
        None => Ok(FeedConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let config = load_feed_config(None).unwrap();
        assert_eq!(config.endpoint, FeedConfig::default().endpoint);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        writeln!(file, "endpoint: ws://feed.example:4000/").unwrap();
        writeln!(file, "max_reconnect_attempts: 2").unwrap();

        let config = load_feed_config(Some(file.path())).unwrap();
        assert_eq!(config.endpoint, "ws://feed.example:4000/");
        assert_eq!(config.max_reconnect_attempts, 2);
    }
}
