//! Scenario replay tool for the battle decision core.
//!
//! Loads a recorded decision point, runs it through the engine, and prints
//! the ranked candidates. Run with: `battle-cli <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Decide, ShowConfig};

/// Replay recorded battle decisions
#[derive(Parser)]
#[command(name = "battle-cli")]
#[command(about = "Replay recorded battle decisions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run one decision from a scenario file
    Decide(Decide),

    /// Print the effective decision config
    Config(ShowConfig),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for RUST_LOG and BATTLE_AI_* overrides)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Decide(cmd) => cmd.execute(),
        Command::Config(cmd) => cmd.execute(),
    }
}

/// Logs to stderr so stdout stays clean for JSON output.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
