//! Ledger commits: every mutation of a combatant's ledger goes through here.
//!
//! A commit folds sustained items into the actor's registry, runs the economy
//! checks the mutation calls for, persists both documents and publishes the
//! change.
use tracing::debug;
use tracker_core::{
    ActionLogEntry, ActorId, CombatantId, EconomyMonitor, EntryTarget, EntryUpdate, ItemId,
    Ledger, Mutation, SourceId,
};

use super::TrackerContext;
use crate::api::Result;
use crate::events::{Event, LedgerEvent};

impl TrackerContext {
    /// Appends `entry`, attaching a staged sustain obligation for its source.
    pub(crate) fn add_entry(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        mut entry: ActionLogEntry,
    ) -> Result<()> {
        if let Some(item) = self.local()?.staging.take(actor, &entry.source_id) {
            entry = entry.with_sustained_item(item);
        }
        let mut ledger = self.documents.ledger(combatant)?;
        ledger.push(entry.clone());
        self.commit(combatant, actor, ledger, Mutation::Add, None)?;

        self.events.publish(Event::Ledger(LedgerEvent::EntryAdded {
            combatant: combatant.clone(),
            entry,
        }));
        Ok(())
    }

    /// Returns `false` when the edit was a no-op (absent or immutable target).
    pub(crate) fn edit_entry(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        source: &SourceId,
        update: EntryUpdate,
    ) -> Result<bool> {
        let mutation = Mutation::Edit {
            movement: update.touches_movement(),
        };
        let mut ledger = self.documents.ledger(combatant)?;
        let entry = match ledger.edit(source, update) {
            Ok(entry) => entry.clone(),
            Err(err) => {
                debug!(%combatant, %err, "edit skipped");
                return Ok(false);
            }
        };
        self.commit(combatant, actor, ledger, mutation, None)?;

        self.events.publish(Event::Ledger(LedgerEvent::EntryEdited {
            combatant: combatant.clone(),
            entry,
        }));
        Ok(true)
    }

    pub(crate) fn remove_entry(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        target: &EntryTarget,
    ) -> Result<Option<ActionLogEntry>> {
        let mut ledger = self.documents.ledger(combatant)?;
        let entry = match ledger.remove(target) {
            Ok(entry) => entry,
            Err(err) => {
                debug!(%combatant, %err, "remove skipped");
                return Ok(None);
            }
        };
        self.commit(combatant, actor, ledger, Mutation::Remove, None)?;

        self.events.publish(Event::Ledger(LedgerEvent::EntryRemoved {
            combatant: combatant.clone(),
            entry: entry.clone(),
        }));
        Ok(Some(entry))
    }

    /// Explicit lapse: the item leaves the registry and every current entry.
    ///
    /// Returns the registered name, if the item was being sustained.
    pub(crate) fn stop_sustaining(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        item: &ItemId,
    ) -> Result<Option<String>> {
        let name = self.documents.actor(actor)?.sustained.name(item).map(str::to_owned);
        let mut ledger = self.documents.ledger(combatant)?;
        let detached = ledger.detach_sustained(item);
        debug!(%combatant, %item, detached, "sustain lapsed");
        self.commit(combatant, actor, ledger, Mutation::Lapse, Some(item))?;
        Ok(name)
    }

    fn commit(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        mut ledger: Ledger,
        mutation: Mutation,
        lapsed: Option<&ItemId>,
    ) -> Result<()> {
        let mut document = self.documents.actor(actor)?;
        let added = document.sustained.apply(ledger.entries(), lapsed);
        if !added.is_empty() {
            debug!(%actor, ?added, "sustain registry grew");
        }

        let mut alerts = Vec::new();
        if mutation.checks_economy() {
            let monitor = EconomyMonitor::new(self.oracles.settings());
            let name = self.actor_name(actor);
            alerts.extend(monitor.check_overspend(&mut ledger, actor, &name, document.snapshot));
            alerts.extend(monitor.check_reaction_overspend(
                &ledger,
                actor,
                &name,
                self.oracles.actors().max_reactions(actor),
            ));
        }

        self.documents.save_ledger(combatant, &ledger)?;
        self.documents.save_actor(actor, &document)?;
        for alert in alerts {
            self.publish_alert(alert);
        }
        Ok(())
    }
}
