//! Tracker services: the authority-side logic behind every signal.
//!
//! [`TrackerContext`] is constructed once per encounter and shared by the
//! ingest path and the combatant workers. Each submodule adds one concern
//! (ledger commits, declarations, movement, turns, sustain choices) as an
//! inherent impl block. Persisted state goes through [`Documents`];
//! process-local state (reroll queues, sustain staging, intents, the active
//! turn) lives here and is reset wholesale when the encounter ends.
mod declarations;
mod ledger;
mod movement;
mod sustain;
mod turns;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};

use tracker_core::{
    ActorId, Alert, IntentRegistry, RerollQueues, SustainStaging, TurnPhase,
};

use crate::api::{Result, RuntimeError};
use crate::authority::AuthorityGate;
use crate::events::{Event, EventBus};
use crate::oracle::OracleManager;
use crate::repository::Documents;

/// Per-encounter state that is never persisted.
#[derive(Debug, Default)]
pub(crate) struct LocalState {
    pub(crate) staging: SustainStaging,
    pub(crate) rerolls: RerollQueues,
    pub(crate) intents: IntentRegistry,
}

pub(crate) struct TrackerContext {
    pub(crate) documents: Documents,
    pub(crate) oracles: OracleManager,
    pub(crate) gate: AuthorityGate,
    pub(crate) events: EventBus,
    local: Mutex<LocalState>,
    phase: RwLock<TurnPhase>,
    sequence: AtomicU64,
}

impl TrackerContext {
    pub(crate) fn new(
        documents: Documents,
        oracles: OracleManager,
        gate: AuthorityGate,
        events: EventBus,
    ) -> Self {
        Self {
            documents,
            oracles,
            gate,
            events,
            local: Mutex::new(LocalState::default()),
            phase: RwLock::new(TurnPhase::Idle),
            sequence: AtomicU64::new(0),
        }
    }

    pub(crate) fn local(&self) -> Result<MutexGuard<'_, LocalState>> {
        self.local
            .lock()
            .map_err(|_| RuntimeError::StatePoisoned("local tracker state"))
    }

    pub(crate) fn phase(&self) -> Result<TurnPhase> {
        self.phase
            .read()
            .map(|phase| phase.clone())
            .map_err(|_| RuntimeError::StatePoisoned("turn phase"))
    }

    pub(crate) fn set_phase(&self, phase: TurnPhase) -> Result<()> {
        let mut current = self
            .phase
            .write()
            .map_err(|_| RuntimeError::StatePoisoned("turn phase"))?;
        *current = phase;
        Ok(())
    }

    /// Monotonic counter for ids the tracker mints itself.
    pub(crate) fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Name used in alert text.
    pub(crate) fn actor_name(&self, actor: &ActorId) -> String {
        self.oracles
            .actors()
            .display_name(actor)
            .unwrap_or_else(|| actor.to_string())
    }

    pub(crate) fn publish_alert(&self, alert: Alert) {
        tracing::debug!(actor = %alert.actor, category = ?alert.category, "{}", alert.message);
        self.events.publish(Event::Alert(alert));
    }

    /// Drops every piece of per-encounter state.
    pub(crate) fn reset(&self) -> Result<usize> {
        {
            let mut local = self.local()?;
            local.staging.clear();
            local.rerolls.clear(None);
            local.intents.clear();
        }
        self.set_phase(TurnPhase::Idle)?;
        Ok(self.documents.clear()?)
    }
}
