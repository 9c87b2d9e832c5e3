//! Validate a scenario file and summarise its contents.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use crate::scenario::Scenario;

/// Validate a scenario file without running it
#[derive(Parser)]
pub struct Check {
    /// Scenario JSON file
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let scenario = Scenario::load(&self.scenario)?;

        println!("Scenario: {}", self.scenario.display());
        println!("Authority: {}", scenario.authority);
        println!("Actors:");
        for actor in &scenario.actors {
            println!(
                "  {} -> {} ({}, speed {})",
                actor.combatant, actor.id, actor.sheet.name, actor.sheet.land_speed
            );
        }
        println!("Hazards: {}", scenario.terrain.hazards.len());
        println!("Signals: {}", scenario.signals.len());
        for (kind, count) in scenario.signal_counts() {
            println!("  {kind:<20} {count}");
        }

        let unknown = scenario.unknown_references();
        if !unknown.is_empty() {
            for (index, name) in &unknown {
                println!("  signal #{index} references unknown {name}");
            }
            bail!("{} signal(s) reference ids missing from the roster", unknown.len());
        }
        println!("OK");
        Ok(())
    }
}
