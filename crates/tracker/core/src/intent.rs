use std::collections::HashMap;

use crate::ids::{ActorId, ItemId};
use crate::signal::Declaration;

/// Explicit "use this item" intents, one per actor.
#[derive(Clone, Debug, Default)]
pub struct IntentRegistry {
    pending: HashMap<ActorId, ItemId>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an intent, replacing any earlier one for the same actor.
    pub fn declare(&mut self, actor: ActorId, item: ItemId) {
        self.pending.insert(actor, item);
    }

    /// Marks `decl` as an explicit use when it comes from the intended item.
    /// The intent is consumed on a match.
    pub fn apply(&mut self, decl: &mut Declaration) -> bool {
        let matches = match (self.pending.get(&decl.actor), decl.origin_item_id()) {
            (Some(intended), Some(item)) => intended == item,
            _ => false,
        };
        if matches {
            self.pending.remove(&decl.actor);
            decl.markers.explicit_use = true;
        }
        matches
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
