//! Declaration ingest, deletions, rerolls and intents.
use tracing::{debug, trace};
use tracker_core::classify::rejection;
use tracker_core::{
    ActionLogEntry, ActorId, CombatantId, Declaration, EntryKind, EntryTarget, EntryUpdate,
    ItemId, SourceId, classify, is_sustain_declaration, sustain_metadata,
};

use super::TrackerContext;
use crate::api::Result;

impl TrackerContext {
    /// Runs one declaration through classification into the ledger.
    ///
    /// Explicit-use intents must already have been applied to `decl`.
    pub(crate) fn declare(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        decl: Declaration,
    ) -> Result<()> {
        if decl.is_reroll() {
            return self.retarget_reroll(combatant, actor, &decl.id);
        }

        if is_sustain_declaration(&decl) {
            match sustain_metadata(&decl) {
                Some(item) => {
                    self.local()?
                        .staging
                        .mark(actor.clone(), decl.id.clone(), item);
                }
                None => debug!(source = %decl.id, "sustain declaration without an item"),
            }
        }

        let viewer = self.gate.local_user();
        let Some(descriptor) = classify(&decl, &viewer) else {
            trace!(source = %decl.id, reason = ?rejection(&decl), "declaration not tracked");
            return Ok(());
        };

        let snapshot = self.documents.actor(actor)?.snapshot;
        let eligible = snapshot.is_quickened_eligible(&descriptor.slug);

        if self.documents.ledger(combatant)?.get_by_source(&decl.id).is_some() {
            let update = EntryUpdate {
                cost: Some(descriptor.cost),
                label: Some(descriptor.label),
                quickened_eligible: Some(eligible),
                ..EntryUpdate::default()
            };
            self.edit_entry(combatant, actor, &decl.id, update)?;
            return Ok(());
        }

        let off_turn = !self.phase()?.is_active(combatant);
        let kind = if descriptor.is_reaction || off_turn {
            EntryKind::Reaction
        } else {
            EntryKind::Standard
        };
        let entry = ActionLogEntry::new(decl.id, descriptor.label, descriptor.cost, kind)
            .with_quickened_eligible(eligible);
        self.add_entry(combatant, actor, entry)
    }

    /// Moves the oldest superseded entry onto the replacement declaration.
    fn retarget_reroll(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        replacement: &SourceId,
    ) -> Result<()> {
        let Some(original) = self.local()?.rerolls.dequeue(combatant) else {
            debug!(%combatant, %replacement, "reroll without a pending original");
            return Ok(());
        };
        if self.documents.ledger(combatant)?.get_by_source(&original).is_none() {
            debug!(%combatant, %original, "rerolled declaration was never tracked");
            return Ok(());
        }
        self.edit_entry(
            combatant,
            actor,
            &original,
            EntryUpdate::retarget(replacement.clone()),
        )?;
        Ok(())
    }

    /// A declaration vanished from the host. Pending rerolls keep their entry.
    pub(crate) fn forget_declaration(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        source: &SourceId,
    ) -> Result<()> {
        if self.local()?.rerolls.contains(combatant, source) {
            debug!(%combatant, %source, "deletion deferred to pending reroll");
            return Ok(());
        }
        self.remove_entry(combatant, actor, &EntryTarget::Source(source.clone()))?;
        Ok(())
    }

    pub(crate) fn request_reroll(&self, combatant: &CombatantId, source: SourceId) -> Result<()> {
        if !self.local()?.rerolls.enqueue(combatant.clone(), source.clone()) {
            debug!(%combatant, %source, "reroll already pending");
        }
        Ok(())
    }

    pub(crate) fn declare_intent(&self, actor: ActorId, item: ItemId) -> Result<()> {
        self.local()?.intents.declare(actor, item);
        Ok(())
    }

    /// Stamps explicit use onto `decl` when it matches a pending intent.
    pub(crate) fn apply_intent(&self, decl: &mut Declaration) -> Result<bool> {
        Ok(self.local()?.intents.apply(decl))
    }
}
