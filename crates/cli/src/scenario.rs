//! Scenario files: a roster, a battle map and the signals to replay.
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use runtime::{
    ActorOracleImpl, ActorSheet, OracleManager, RosterOracleImpl, StaticSession,
    TerrainOracleImpl,
};
use serde::Deserialize;
use tracker_core::{ActionSignal, ActorId, CombatantId, UserId};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// User the replay runs as; overridden by `--viewer`.
    #[serde(default = "default_authority")]
    pub authority: UserId,
    pub actors: Vec<ScenarioActor>,
    #[serde(default)]
    pub terrain: TerrainOracleImpl,
    pub signals: Vec<ActionSignal>,
}

#[derive(Debug, Deserialize)]
pub struct ScenarioActor {
    pub id: ActorId,
    pub combatant: CombatantId,
    #[serde(flatten)]
    pub sheet: ActorSheet,
}

fn default_authority() -> UserId {
    UserId::from("gm")
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scenario {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Rejects duplicate ids and a grid the terrain oracle cannot measure.
    fn validate(&self) -> Result<()> {
        let mut actors = BTreeSet::new();
        let mut combatants = BTreeSet::new();
        for actor in &self.actors {
            if !actors.insert(&actor.id) {
                bail!("Actor {} is listed twice", actor.id);
            }
            if !combatants.insert(&actor.combatant) {
                bail!("Combatant {} is listed twice", actor.combatant);
            }
        }
        if self.terrain.grid_size <= 0.0 {
            bail!("Grid size must be positive, got {}", self.terrain.grid_size);
        }
        Ok(())
    }

    pub fn combatants(&self) -> impl Iterator<Item = &CombatantId> {
        self.actors.iter().map(|actor| &actor.combatant)
    }

    /// Signals per kind, for summaries.
    pub fn signal_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for signal in &self.signals {
            *counts.entry(signal.name()).or_default() += 1;
        }
        counts
    }

    /// Signals naming an actor or combatant that is not on the roster.
    pub fn unknown_references(&self) -> Vec<(usize, String)> {
        let actors: BTreeSet<_> = self.actors.iter().map(|a| &a.id).collect();
        let combatants: BTreeSet<_> = self.combatants().collect();

        let mut unknown = Vec::new();
        for (index, signal) in self.signals.iter().enumerate() {
            let missing = match signal {
                ActionSignal::Declaration(decl) => {
                    (!actors.contains(&decl.actor)).then(|| decl.actor.to_string())
                }
                ActionSignal::DeclarationDeleted { actor, .. }
                | ActionSignal::RerollRequested { actor, .. }
                | ActionSignal::IntentDeclared { actor, .. }
                | ActionSignal::SustainChoice { actor, .. } => {
                    (!actors.contains(actor)).then(|| actor.to_string())
                }
                ActionSignal::Movement(update) => (!combatants.contains(&update.combatant))
                    .then(|| update.combatant.to_string()),
                ActionSignal::TurnChange(change) => change
                    .current
                    .combatant
                    .as_ref()
                    .filter(|c| !combatants.contains(c))
                    .map(ToString::to_string),
                ActionSignal::EncounterEnded => None,
            };
            if let Some(name) = missing {
                unknown.push((index, name));
            }
        }
        unknown
    }

    /// In-memory oracles for this scenario, seen by `viewer`.
    pub fn oracles(&self, viewer: UserId) -> OracleManager {
        let actors = ActorOracleImpl::new();
        let roster = RosterOracleImpl::new();
        for actor in &self.actors {
            actors.insert(actor.id.clone(), actor.sheet.clone());
            roster.insert(actor.combatant.clone(), actor.id.clone());
        }
        OracleManager::new(
            Arc::new(actors),
            Arc::new(self.terrain.clone()),
            Arc::new(roster),
            Arc::new(StaticSession::authority(viewer)),
        )
    }
}
