//! Cloneable façade for feeding signals to the tracker and reading its state.
//!
//! [`TrackerHandle`] hides the authority gate, roster lookups and worker
//! plumbing. Every method is safe to call from any participant; mutations
//! by a non-authoritative participant are forwarded or skipped.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, trace};
use tracker_core::{
    ActionLogEntry, ActionSignal, ActorId, CombatantId, EntryTarget, Ledger, SlotPlan, SourceId,
    SustainedItem, TurnChange, TurnPhase, UserId,
};

use super::errors::{Result, RuntimeError};
use super::requests::{PrivilegedRequest, RequestRelay};
use crate::authority::Admission;
use crate::events::{Event, LedgerEvent, Topic};
use crate::services::TrackerContext;
use crate::workers::{Command, WorkerPool};

/// Client-facing handle to interact with the tracker
#[derive(Clone)]
pub struct TrackerHandle {
    ctx: Arc<TrackerContext>,
    workers: Arc<WorkerPool>,
    relay: Option<Arc<dyn RequestRelay>>,
}

impl TrackerHandle {
    pub(crate) fn new(
        ctx: Arc<TrackerContext>,
        workers: Arc<WorkerPool>,
        relay: Option<Arc<dyn RequestRelay>>,
    ) -> Self {
        Self {
            ctx,
            workers,
            relay,
        }
    }

    /// Feed one host signal to the tracker.
    ///
    /// The authority applies it. Other participants forward their own choices
    /// (sustain, reroll, intent) through the relay and skip the rest.
    pub async fn ingest(&self, signal: ActionSignal) -> Result<()> {
        match self.ctx.gate.admit(&signal) {
            Admission::Apply => self.apply(signal).await,
            Admission::Forward(request) => {
                let relay = self.relay.as_ref().ok_or(RuntimeError::RelayUnavailable)?;
                let from = self.ctx.gate.local_user();
                debug!(%from, ?request, "forwarding to authority");
                relay.forward(&from, request).await
            }
            Admission::Skip => {
                trace!(signal = signal.name(), "left to the session authority");
                Ok(())
            }
        }
    }

    /// Apply a request another participant forwarded. Authority only.
    pub async fn handle_request(&self, from: &UserId, request: PrivilegedRequest) -> Result<()> {
        self.ctx.gate.ensure()?;
        debug!(%from, ?request, "privileged request received");
        self.apply(request.into_signal()).await
    }

    async fn apply(&self, signal: ActionSignal) -> Result<()> {
        match signal {
            ActionSignal::Declaration(mut decl) => {
                let Some(combatant) = self.combatant_for(&decl.actor) else {
                    return Ok(());
                };
                self.ctx.apply_intent(&mut decl)?;
                let actor = decl.actor.clone();
                self.workers
                    .request(&combatant, &actor, |reply| Command::Declare { decl, reply })
                    .await?
            }
            ActionSignal::DeclarationDeleted { actor, source_id } => {
                let Some(combatant) = self.combatant_for(&actor) else {
                    return Ok(());
                };
                self.workers
                    .request(&combatant, &actor, |reply| Command::Forget {
                        source: source_id,
                        reply,
                    })
                    .await?
            }
            ActionSignal::RerollRequested { actor, source_id } => {
                let Some(combatant) = self.combatant_for(&actor) else {
                    return Ok(());
                };
                self.ctx.request_reroll(&combatant, source_id)
            }
            ActionSignal::IntentDeclared { actor, item_id } => {
                self.ctx.declare_intent(actor, item_id)
            }
            ActionSignal::Movement(update) => {
                let Some(actor) = self.actor_for(&update.combatant) else {
                    return Ok(());
                };
                self.workers.enqueue_move(&actor, update).await
            }
            ActionSignal::TurnChange(change) => self.change_turn(change).await,
            ActionSignal::SustainChoice {
                actor,
                item_id,
                item_name,
                choice,
            } => {
                let Some(combatant) = self.combatant_for(&actor) else {
                    return Ok(());
                };
                self.workers
                    .request(&combatant, &actor, |reply| Command::Sustain {
                        item_id,
                        item_name,
                        choice,
                        reply,
                    })
                    .await?
            }
            ActionSignal::EncounterEnded => self.end_encounter().await,
        }
    }

    async fn change_turn(&self, change: TurnChange) -> Result<()> {
        if !change.is_forward() {
            debug!(
                round = change.current.round,
                turn = change.current.turn,
                "turn rewound; ledgers untouched"
            );
            return Ok(());
        }

        if let Some(previous) = change.previous.as_ref().and_then(|p| p.combatant.as_ref())
            && let Some(actor) = self.actor_for(previous)
        {
            self.workers
                .request(previous, &actor, |reply| Command::EndTurn { reply })
                .await??;
        }

        if let Some(current) = change.current.combatant.as_ref()
            && let Some(actor) = self.actor_for(current)
        {
            info!(round = change.current.round, turn = change.current.turn, %current, "turn change");
            self.workers
                .request(current, &actor, |reply| Command::StartTurn { reply })
                .await??;
        }
        Ok(())
    }

    async fn end_encounter(&self) -> Result<()> {
        let workers = self.workers.abort_all().await?;
        let documents = self.ctx.reset()?;
        info!(workers, documents, "encounter ended; tracker state cleared");
        self.ctx
            .events
            .publish(Event::Ledger(LedgerEvent::EncounterEnded));
        Ok(())
    }

    fn combatant_for(&self, actor: &ActorId) -> Option<CombatantId> {
        let combatant = self.ctx.oracles.roster().combatant_for_actor(actor);
        if combatant.is_none() {
            debug!(%actor, "actor has no combatant in this encounter");
        }
        combatant
    }

    fn actor_for(&self, combatant: &CombatantId) -> Option<ActorId> {
        let actor = self.ctx.oracles.roster().actor_for_combatant(combatant);
        if actor.is_none() {
            debug!(%combatant, "combatant is not on the roster");
        }
        actor
    }

    /// Record a manual entry, e.g. a GM correction. Authority only.
    pub async fn record_entry(&self, combatant: &CombatantId, entry: ActionLogEntry) -> Result<()> {
        self.ctx.gate.ensure()?;
        let Some(actor) = self.actor_for(combatant) else {
            return Ok(());
        };
        self.workers
            .request(combatant, &actor, |reply| Command::Record { entry, reply })
            .await?
    }

    /// Remove an entry by source or position. Authority only.
    pub async fn remove_entry(
        &self,
        combatant: &CombatantId,
        target: EntryTarget,
    ) -> Result<Option<ActionLogEntry>> {
        self.ctx.gate.ensure()?;
        let Some(actor) = self.actor_for(combatant) else {
            return Ok(None);
        };
        self.workers
            .request(combatant, &actor, |reply| Command::Remove { target, reply })
            .await?
    }

    /// Wait until every queued command, movement included, has been applied.
    pub async fn drain(&self) -> Result<()> {
        self.workers.flush().await
    }

    pub fn ledger(&self, combatant: &CombatantId) -> Result<Ledger> {
        Ok(self.ctx.documents.ledger(combatant)?)
    }

    pub fn entries(&self, combatant: &CombatantId) -> Result<Vec<ActionLogEntry>> {
        Ok(self.ledger(combatant)?.entries().to_vec())
    }

    pub fn entry_by_source(
        &self,
        combatant: &CombatantId,
        source: &SourceId,
    ) -> Result<Option<ActionLogEntry>> {
        Ok(self.ledger(combatant)?.get_by_source(source).cloned())
    }

    pub fn last_entry(&self, combatant: &CombatantId) -> Result<Option<ActionLogEntry>> {
        Ok(self.ledger(combatant)?.last().cloned())
    }

    /// Effects the actor is currently sustaining.
    pub fn sustained(&self, actor: &ActorId) -> Result<Vec<SustainedItem>> {
        Ok(self.ctx.documents.actor(actor)?.sustained.iter().collect())
    }

    /// Slot layout for rendering, using the snapshot taken at turn start.
    pub fn slots(&self, combatant: &CombatantId) -> Result<SlotPlan> {
        let ledger = self.ledger(combatant)?;
        let quickened = match self.ctx.oracles.roster().actor_for_combatant(combatant) {
            Some(actor) => self.ctx.documents.actor(&actor)?.snapshot.is_quickened,
            None => false,
        };
        Ok(ledger.allocate_slots(quickened))
    }

    /// Movement updates accepted for `combatant` but not yet applied.
    pub fn movement_queue_depth(&self, combatant: &CombatantId) -> usize {
        self.workers.queue_depth(combatant)
    }

    /// Superseded declarations waiting for their reroll.
    pub fn pending_rerolls(&self, combatant: &CombatantId) -> Result<usize> {
        Ok(self.ctx.local()?.rerolls.depth(combatant))
    }

    pub fn phase(&self) -> Result<TurnPhase> {
        self.ctx.phase()
    }

    pub fn is_authority(&self) -> bool {
        self.ctx.gate.is_authority()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Alert` - Economy and undo-correction alerts
    /// - `Topic::Reminder` - Start-of-turn sustain reminders
    /// - `Topic::Ledger` - Entry, turn and sustain registry changes
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut alerts = handle.subscribe(Topic::Alert);
    /// while let Ok(event) = alerts.recv().await {
    ///     // Render the alert
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.ctx.events.subscribe(topic)
    }

    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.ctx.events.subscribe_multiple(topics)
    }

    pub(crate) async fn shutdown_workers(&self) -> Result<()> {
        self.workers.shutdown().await
    }
}
