//! Stream a scenario through the tracker and print what it reports.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use runtime::{RuntimeConfig, Topic, Tracker};
use tokio::sync::broadcast::error::TryRecvError;
use tracker_core::UserId;

use crate::logging;
use crate::report;
use crate::scenario::Scenario;

/// Stream a scenario's signals through the tracker
#[derive(Parser)]
pub struct Replay {
    /// Scenario JSON file
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// User the tracker runs as; whispers to other users show as "Secret Action"
    #[arg(short, long, value_name = "USER")]
    viewer: Option<String>,

    /// Also write logs to <DIR>/tracker.log
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

impl Replay {
    pub async fn execute(self) -> Result<()> {
        let _guard = logging::setup_logging(self.log_dir.as_deref())?;

        let scenario = Scenario::load(&self.scenario)?;
        let viewer = self
            .viewer
            .map(UserId::from)
            .unwrap_or_else(|| scenario.authority.clone());
        let config = RuntimeConfig::from_env();
        tracing::info!(%viewer, signals = scenario.signals.len(), "Starting replay");

        let tracker = Tracker::builder()
            .config(config)
            .oracles(scenario.oracles(viewer))
            .build()
            .context("Failed to build tracker")?;
        let handle = tracker.handle();
        let mut events = handle.subscribe_multiple(&[Topic::Ledger, Topic::Alert, Topic::Reminder]);

        for (index, signal) in scenario.signals.iter().cloned().enumerate() {
            let name = signal.name();
            handle
                .ingest(signal)
                .await
                .with_context(|| format!("Signal #{index} ({name}) failed"))?;
            handle.drain().await?;

            // Ledger first so alerts print under the change that caused them.
            for topic in [Topic::Ledger, Topic::Alert, Topic::Reminder] {
                let Some(rx) = events.get_mut(&topic) else {
                    continue;
                };
                loop {
                    match rx.try_recv() {
                        Ok(event) => println!("{}", report::describe(&event)),
                        Err(TryRecvError::Lagged(missed)) => {
                            tracing::warn!(%topic, missed, "Event subscriber lagged");
                        }
                        Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                    }
                }
            }
        }

        println!();
        println!("Final ledgers:");
        for combatant in scenario.combatants() {
            let ledger = handle.ledger(combatant)?;
            let slots = handle.slots(combatant)?;
            println!("  {}", report::ledger_summary(combatant, &ledger, &slots));
        }

        tracker.shutdown().await?;
        tracing::info!("Replay complete");
        Ok(())
    }
}
