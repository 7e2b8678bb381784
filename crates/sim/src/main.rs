//! Headless simulation harness.
//!
//! Run with: `cargo run -p kinetic-sim -- run slope_stick`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{List, Run};

/// Replays scripted scenarios against the movement/combat core
#[derive(Parser)]
#[command(name = "kinetic-sim")]
#[command(about = "Headless movement and combat simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run one scenario, or every scenario with --all
    Run(Run),

    /// List available scenarios
    List(List),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::List(cmd) => cmd.execute(),
    }
}

fn setup_logging(default_level: &str) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::EnvFilter::from_default_env(),
        Err(_) => tracing_subscriber::EnvFilter::try_new(default_level)
            .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", default_level, e))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
