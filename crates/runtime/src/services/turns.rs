//! Turn boundaries.
use tracing::info;
use tracker_core::{
    ActorId, CombatantId, Condition, ConditionReadout, EconomyMonitor, Ledger, Setting,
    TurnPhase, TurnSnapshot, plan_turn_start,
};

use super::TrackerContext;
use crate::api::Result;
use crate::events::{Event, LedgerEvent, SustainReminder};

impl TrackerContext {
    /// Captures the snapshot, reseeds the ledger with condition drains and
    /// raises sustain reminders.
    pub(crate) fn start_turn(&self, combatant: &CombatantId, actor: &ActorId) -> Result<()> {
        let actors = self.oracles.actors();
        let snapshot = TurnSnapshot::capture(actors, actor);
        let plan = plan_turn_start(snapshot, ConditionReadout::read(actors, actor));
        if let Some(stunned) = plan.stunned_after {
            actors.set_condition_value(actor, Condition::Stunned, stunned);
        }

        let mut document = self.documents.actor(actor)?;
        document.snapshot = plan.snapshot;
        self.documents.save_actor(actor, &document)?;
        self.documents
            .save_ledger(combatant, &Ledger::with_entries(plan.drains.clone()))?;
        self.set_phase(TurnPhase::ActorTurnActive(combatant.clone()))?;

        info!(
            %combatant,
            quickened = snapshot.is_quickened,
            drains = plan.drains.len(),
            "turn started"
        );
        self.events.publish(Event::Ledger(LedgerEvent::TurnStarted {
            combatant: combatant.clone(),
            snapshot: plan.snapshot,
            drains: plan.drains,
        }));

        if self.oracles.settings().enabled(Setting::SustainReminder) {
            for item in document.sustained.iter() {
                self.events.publish(Event::Reminder(SustainReminder {
                    actor: actor.clone(),
                    item_id: item.id,
                    item_name: item.name,
                }));
            }
        }
        Ok(())
    }

    /// Reports any unspent actions for the turn that just closed.
    pub(crate) fn end_turn(&self, combatant: &CombatantId, actor: &ActorId) -> Result<()> {
        let ledger = self.documents.ledger(combatant)?;
        let snapshot = self.documents.actor(actor)?.snapshot;
        let monitor = EconomyMonitor::new(self.oracles.settings());
        if let Some(alert) =
            monitor.check_underspend(&ledger, actor, &self.actor_name(actor), snapshot)
        {
            self.publish_alert(alert);
        }

        if self.phase()?.is_active(combatant) {
            self.set_phase(TurnPhase::Idle)?;
        }
        info!(%combatant, spent = ledger.actions_spent(), "turn ended");
        self.events.publish(Event::Ledger(LedgerEvent::TurnEnded {
            combatant: combatant.clone(),
        }));
        Ok(())
    }
}
