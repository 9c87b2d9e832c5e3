//! Per-combatant, per-round action log.
//!
//! The [`Ledger`] owns the ordered entries and keeps `actions_spent` /
//! `reactions_spent` in step with them after every mutation. Insertion order is
//! resolution order and drives slot allocation.
mod slots;

pub use slots::{Slot, SlotKind, SlotPlan};

use crate::entry::{ActionLogEntry, EntryKind, EntryUpdate};
use crate::ids::{ItemId, SourceId};

/// Ledger mutation failures. Callers treat every variant as a no-op.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("no entry with source '{0}'")]
    EntryNotFound(SourceId),

    #[error("index {index} is out of range for a ledger of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("entry '{0}' was written by the tracker and cannot be edited")]
    ImmutableEntry(SourceId),
}

/// How `remove` locates its target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntryTarget {
    Source(SourceId),
    Index(usize),
}

impl From<SourceId> for EntryTarget {
    fn from(source: SourceId) -> Self {
        EntryTarget::Source(source)
    }
}

/// What just happened to a ledger; decides which economy checks follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Mutation {
    Add,
    Edit { movement: bool },
    Remove,
    Lapse,
}

impl Mutation {
    /// Overspend checks are skipped for drag edits, undos and lapses.
    pub fn checks_economy(self) -> bool {
        match self {
            Mutation::Add => true,
            Mutation::Edit { movement } => !movement,
            Mutation::Remove | Mutation::Lapse => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ledger {
    entries: Vec<ActionLogEntry>,
    actions_spent: u32,
    reactions_spent: u32,
    /// Highest non-reaction total that already raised an overspend alert.
    last_overspend_alert: u32,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with `entries` (start-of-turn drains), alert state reset.
    pub fn with_entries(entries: Vec<ActionLogEntry>) -> Self {
        let mut ledger = Self {
            entries,
            ..Self::default()
        };
        ledger.recompute();
        ledger
    }

    pub fn entries(&self) -> &[ActionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn actions_spent(&self) -> u32 {
        self.actions_spent
    }

    pub fn reactions_spent(&self) -> u32 {
        self.reactions_spent
    }

    pub fn last_overspend_alert(&self) -> u32 {
        self.last_overspend_alert
    }

    /// Raises the alert watermark. Never lowers it.
    pub fn record_overspend_alert(&mut self, total: u32) {
        self.last_overspend_alert = self.last_overspend_alert.max(total);
    }

    pub fn get_by_source(&self, source: &SourceId) -> Option<&ActionLogEntry> {
        self.entries.iter().find(|e| &e.source_id == source)
    }

    pub fn position(&self, source: &SourceId) -> Option<usize> {
        self.entries.iter().position(|e| &e.source_id == source)
    }

    pub fn last(&self) -> Option<&ActionLogEntry> {
        self.entries.last()
    }

    pub fn push(&mut self, entry: ActionLogEntry) {
        self.entries.push(entry);
        self.recompute();
    }

    /// Shallow-merges `update` into the entry keyed by `source`.
    pub fn edit(
        &mut self,
        source: &SourceId,
        update: EntryUpdate,
    ) -> Result<&ActionLogEntry, LedgerError> {
        let index = self
            .position(source)
            .ok_or_else(|| LedgerError::EntryNotFound(source.clone()))?;
        if self.entries[index].is_immutable() {
            return Err(LedgerError::ImmutableEntry(source.clone()));
        }
        update.apply(&mut self.entries[index]);
        self.recompute();
        Ok(&self.entries[index])
    }

    pub fn remove(&mut self, target: &EntryTarget) -> Result<ActionLogEntry, LedgerError> {
        let index = match target {
            EntryTarget::Source(source) => self
                .position(source)
                .ok_or_else(|| LedgerError::EntryNotFound(source.clone()))?,
            EntryTarget::Index(index) => *index,
        };
        if index >= self.entries.len() {
            return Err(LedgerError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.recompute();
        Ok(removed)
    }

    pub fn pop(&mut self) -> Option<ActionLogEntry> {
        let removed = self.entries.pop();
        self.recompute();
        removed
    }

    /// Drops `item` from every entry so later registry passes do not re-add it.
    pub fn detach_sustained(&mut self, item: &ItemId) -> usize {
        let mut detached = 0;
        for entry in &mut self.entries {
            if entry.sustained_item.as_ref().is_some_and(|s| &s.id == item) {
                entry.sustained_item = None;
                detached += 1;
            }
        }
        detached
    }

    /// Total distance attributed to move entries.
    pub fn recorded_distance(&self) -> u32 {
        self.entries.iter().map(ActionLogEntry::distance).sum()
    }

    /// Distance recorded by every entry except the last one.
    pub fn distance_before_last(&self) -> u32 {
        self.recorded_distance() - self.last().map_or(0, ActionLogEntry::distance)
    }

    pub fn reaction_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_reaction()).count()
    }

    /// Actions counted toward underspend: standard and system entries.
    pub fn budget_spent(&self) -> u32 {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::Standard | EntryKind::System))
            .map(|e| e.cost)
            .sum()
    }

    pub fn has_eligible_spend(&self) -> bool {
        self.entries
            .iter()
            .any(|e| !e.is_reaction() && e.quickened_eligible && e.cost > 0)
    }

    pub fn allocate_slots(&self, is_quickened: bool) -> SlotPlan {
        slots::allocate(&self.entries, is_quickened)
    }

    fn recompute(&mut self) {
        let (reactions, actions): (Vec<_>, Vec<_>) =
            self.entries.iter().partition(|e| e.is_reaction());
        self.actions_spent = actions.iter().map(|e| e.cost).sum();
        self.reactions_spent = reactions.iter().map(|e| e.cost).sum();
    }
}
