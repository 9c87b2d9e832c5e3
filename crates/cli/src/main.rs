//! Action tracker command-line tool.
//!
//! Replays recorded encounter signals through the runtime and reports what
//! the tracker made of them.
//!
//! ```bash
//! action-tracker replay demos/skirmish.json --viewer gm
//! action-tracker check demos/skirmish.json
//! ```

mod commands;
mod logging;
mod report;
mod scenario;

use anyhow::Result;
use clap::Parser;
use commands::{Check, Replay};

/// Action economy tracker for turn-based encounters
#[derive(Parser)]
#[command(name = "action-tracker")]
#[command(about = "Replay and inspect action tracker scenarios", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Stream a scenario's signals through the tracker
    Replay(Replay),

    /// Validate a scenario file without running it
    Check(Check),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for TRACKER_* and RUST_LOG)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay(cmd) => cmd.execute().await,
        Command::Check(cmd) => cmd.execute(),
    }
}
