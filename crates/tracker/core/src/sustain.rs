//! Sustain obligations.
//!
//! [`SustainRegistry`] is the actor's long-lived list of effects that need
//! renewing; it survives round rollover and only shrinks on an explicit lapse.
//! [`SustainStaging`] carries a detected obligation from classification time
//! to the moment the matching entry is committed.
use std::collections::{BTreeMap, HashMap};

use crate::entry::{ActionLogEntry, SustainedItem};
use crate::ids::{ActorId, ItemId, SourceId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SustainRegistry {
    items: BTreeMap<ItemId, String>,
}

impl SustainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.items.contains_key(item)
    }

    pub fn name(&self, item: &ItemId) -> Option<&str> {
        self.items.get(item).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = SustainedItem> + '_ {
        self.items
            .iter()
            .map(|(id, name)| SustainedItem::new(id.clone(), name.clone()))
    }

    /// Merges the sustained items of `entries` after dropping `lapsed`.
    ///
    /// Returns the ids added by this pass.
    pub fn apply(&mut self, entries: &[ActionLogEntry], lapsed: Option<&ItemId>) -> Vec<ItemId> {
        if let Some(lapsed) = lapsed {
            self.items.remove(lapsed);
        }
        let mut added = Vec::new();
        for item in entries.iter().filter_map(|e| e.sustained_item.as_ref()) {
            if Some(&item.id) == lapsed {
                continue;
            }
            if self
                .items
                .insert(item.id.clone(), item.name.clone())
                .is_none()
            {
                added.push(item.id.clone());
            }
        }
        added
    }
}

/// Pending sustain associations keyed by `(actor, source)`.
#[derive(Clone, Debug, Default)]
pub struct SustainStaging {
    pending: HashMap<(ActorId, SourceId), SustainedItem>,
}

impl SustainStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, actor: ActorId, source: SourceId, item: SustainedItem) {
        self.pending.insert((actor, source), item);
    }

    /// Consumes the association for `(actor, source)`, if one was staged.
    pub fn take(&mut self, actor: &ActorId, source: &SourceId) -> Option<SustainedItem> {
        self.pending.remove(&(actor.clone(), source.clone()))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
