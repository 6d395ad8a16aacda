//! Bullet Journal MCP Server - Main Entry Point
//!
//! The actual implementation is in the `bujo_mcp` library.

use anyhow::Result;
use bujo_mcp::{BujoServerHandler, ServerConfig, logging};
use clap::{CommandFactory, Parser};
use mcp_attr::server::serve_stdio;
use std::path::PathBuf;
use tracing::info;

/// Bullet Journal MCP Server - rapid logging, migration and recurring tasks via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal data file
    file: PathBuf,

    /// Enable git synchronization on save
    #[arg(long)]
    sync_git: bool,

    /// Log filter, e.g. "debug" or "bujo_mcp=trace" (logs go to stderr)
    #[arg(long, env = "BUJO_LOG")]
    log_level: Option<String>,

    /// Maximum bullets created by one add_recurring call (capped at 366)
    #[arg(
        long,
        env = "BUJO_RECURRENCE_LIMIT",
        default_value_t = bujo_mcp::recurrence::DEFAULT_LIMIT
    )]
    recurrence_limit: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            file: args.file,
            sync_git: args.sync_git,
            log_filter: args.log_level,
            recurrence_limit: args.recurrence_limit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    }

    let config = ServerConfig::from(Args::parse());
    logging::init(config.log_filter.as_deref());
    info!(file = %config.file.display(), sync_git = config.sync_git, "starting bujo-mcp");

    let handler = BujoServerHandler::with_config(&config)?;
    serve_stdio(handler).await?;
    Ok(())
}
