use crate::errors::{AppError, AppResult};
use clap::{Parser, Subcommand};
use serde::Serialize;

pub mod commands;

/// Bitcoin staking CLI
#[derive(Parser)]
#[command(name = "stakercli")]
#[command(about = "Build and check phase-1 staking transactions and drive the staker daemon")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Commands related to Babylon BTC transactions Staking/Unbonding/Slashing
    #[command(visible_alias = "tr")]
    Transaction(commands::transaction::TransactionCommand),
    /// Commands talking to the staker daemon over JSON-RPC
    #[command(visible_alias = "dn")]
    Daemon(commands::daemon::DaemonCommand),
}

/// Print a command result as indented JSON on stdout
pub fn print_resp_json<T: Serialize>(resp: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(resp)
        .map_err(|e| AppError::Parse(format!("failed to encode response: {}", e)))?;
    println!("{}", json);
    Ok(())
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transaction(command) => command.run(),
        Commands::Daemon(command) => command.run().await,
    }
}
