//! Medialift CLI - store-to-channel media publishing
//!
//! Provides commands for:
//! - Running a full publish batch (`medialift run`)
//! - Previewing the work list without transferring anything
//!   (`medialift scan`)
//!
//! The OAuth access token is read from `MEDIALIFT_ACCESS_TOKEN`; token
//! acquisition and refresh happen outside this tool.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{run::RunCommand, scan::ScanCommand};
use medialift_core::config::Config;
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "medialift", version, about = "Publish a media folder tree to a channel")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile, upload new items and apply the post-upload action
    Run(RunCommand),
    /// Show what a run would upload, without transferring anything
    Scan(ScanCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    // Setup tracing: -v flags override the configured level
    let filter = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Run(cmd) => cmd.execute(format, config).await,
        Commands::Scan(cmd) => cmd.execute(format, config).await,
    }
}
