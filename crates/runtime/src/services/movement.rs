//! Applies movement plans to the ledger.
use tracing::{debug, trace};
use tracker_core::{
    ActionLogEntry, ActorId, Alert, CombatantId, EntryTarget, EntryUpdate, MeasuredPath,
    MovePlan, MoveStep, MovementUpdate, SourceId, plan_movement,
};

use super::TrackerContext;
use crate::api::Result;

impl TrackerContext {
    /// Brings the ledger in line with the combatant's current path.
    ///
    /// Only the combatant holding the active turn is reconciled.
    pub(crate) fn reconcile_movement(
        &self,
        actor: &ActorId,
        update: &MovementUpdate,
    ) -> Result<()> {
        let combatant = &update.combatant;
        if !self.phase()?.is_active(combatant) {
            trace!(%combatant, "movement outside the active turn");
            return Ok(());
        }

        let path = MeasuredPath::measure(&update.points, self.oracles.terrain());
        let full_clear = path.is_none();
        let flying = path.is_some_and(|p| p.elevated);
        let speed = self.oracles.actors().speed(actor, flying);

        let ledger = self.documents.ledger(combatant)?;
        let steps = match plan_movement(&ledger, path, speed) {
            MovePlan::Ignore(reason) => {
                trace!(%combatant, %reason, "movement ignored");
                return Ok(());
            }
            MovePlan::Apply(steps) => steps,
        };

        for step in steps {
            self.apply_move_step(combatant, actor, step, full_clear)?;
        }
        Ok(())
    }

    fn apply_move_step(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        step: MoveStep,
        full_clear: bool,
    ) -> Result<()> {
        match step {
            MoveStep::Undo {
                source,
                label,
                was_move,
            } => {
                let removed = self.remove_entry(combatant, actor, &EntryTarget::Source(source))?;
                if removed.is_some() && !was_move {
                    self.publish_alert(Alert::undo_correction(actor.clone(), &label, full_clear));
                }
            }
            MoveStep::Resize {
                source,
                segment,
                cost,
            } => {
                self.edit_entry(
                    combatant,
                    actor,
                    &source,
                    EntryUpdate::resize_move(segment, cost),
                )?;
            }
            MoveStep::Append { segment, cost } => {
                let source = SourceId::movement(combatant, self.next_sequence());
                debug!(%combatant, %source, distance = segment.distance, cost, "movement appended");
                self.add_entry(
                    combatant,
                    actor,
                    ActionLogEntry::movement(source, segment, cost),
                )?;
            }
        }
        Ok(())
    }
}
