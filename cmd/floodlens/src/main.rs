//! floodlens - groups event messages into ranked topical clusters and tiers
//! the accounts that post them.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod input;

use commands::{AnalyzeCommand, TiersCommand};

/// Cluster, rank and tier event messages.
///
/// Input is a JSON-lines file with one message object per line:
///   {"id": "1", "text": "...", "date": "2024-01-01T10:00:00Z", "username": "...",
///    "keywords": ["flood"], "photos": [], "language": "English"}
#[derive(Parser)]
#[command(name = "floodlens")]
#[command(about = "Message clustering and account tiering")]
#[command(version)]
pub struct Cli {
    /// Pipeline config file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster messages and rank the clusters by importance
    Analyze(AnalyzeCommand),
    /// Tier accounts by posting frequency
    Tiers(TiersCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Analyze(cmd) => cmd.run(&cli, cfg),
        Commands::Tiers(cmd) => cmd.run(&cli, cfg),
    }
}
