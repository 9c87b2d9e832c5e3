//! Answers to sustain reminders.
use tracing::debug;
use tracker_core::{
    ActorId, CombatantId, Declaration, ItemId, SourceId, SustainDecision, SustainedItem,
};

use super::TrackerContext;
use crate::api::Result;
use crate::events::{Event, LedgerEvent};

impl TrackerContext {
    pub(crate) fn sustain_choice(
        &self,
        combatant: &CombatantId,
        actor: &ActorId,
        item_id: ItemId,
        item_name: String,
        choice: SustainDecision,
    ) -> Result<()> {
        match choice {
            SustainDecision::Sustain => {
                let name = if item_name.is_empty() {
                    let document = self.documents.actor(actor)?;
                    document.sustained.name(&item_id).unwrap_or_default().to_owned()
                } else {
                    item_name
                };
                let source =
                    SourceId::new(format!("sustain-{}-{}", item_id, self.next_sequence()));
                let decl = Declaration::sustain(source, actor.clone(), item_id.clone(), &name);
                let item = SustainedItem::new(
                    item_id,
                    decl.markers.sustained_item_name.clone().unwrap_or(name),
                );
                self.declare(combatant, actor, decl)?;

                self.events.publish(Event::Ledger(LedgerEvent::SustainRenewed {
                    actor: actor.clone(),
                    item,
                }));
            }
            SustainDecision::Lapse => {
                let registered = self.stop_sustaining(combatant, actor, &item_id)?;
                if registered.is_none() {
                    debug!(%actor, item = %item_id, "lapse of an item that was not sustained");
                }
                let item_name = registered.or((!item_name.is_empty()).then_some(item_name));
                self.events.publish(Event::Ledger(LedgerEvent::SustainLapsed {
                    actor: actor.clone(),
                    item_id,
                    item_name,
                }));
            }
        }
        Ok(())
    }
}
