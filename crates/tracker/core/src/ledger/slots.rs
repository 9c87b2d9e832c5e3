use crate::config::TrackerConfig;
use crate::entry::ActionLogEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SlotKind {
    Quickened,
    Standard,
    Overspend,
}

/// One spent action unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub kind: SlotKind,
    /// Index of the entry in the ledger.
    pub entry_index: usize,
    /// Which unit of the entry's cost this slot holds.
    pub unit: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotPlan {
    pub quickened: Option<Slot>,
    pub standard: Vec<Slot>,
    pub overspend: Vec<Slot>,
}

impl SlotPlan {
    pub fn unspent_standard(&self) -> usize {
        (TrackerConfig::BASE_ACTION_CAP as usize).saturating_sub(self.standard.len())
    }

    pub fn is_overspent(&self) -> bool {
        !self.overspend.is_empty()
    }
}

/// Walks non-reaction entries in order. The first quickened-eligible entry
/// takes the bonus slot with its first unit; every other unit fills standard
/// slots, then overspend.
pub(super) fn allocate(entries: &[ActionLogEntry], is_quickened: bool) -> SlotPlan {
    let cap = TrackerConfig::BASE_ACTION_CAP as usize;
    let mut plan = SlotPlan::default();

    for (entry_index, entry) in entries.iter().enumerate() {
        if entry.is_reaction() || entry.cost == 0 {
            continue;
        }
        let mut first_unit = 0;
        if is_quickened && plan.quickened.is_none() && entry.quickened_eligible {
            plan.quickened = Some(Slot {
                kind: SlotKind::Quickened,
                entry_index,
                unit: 0,
            });
            first_unit = 1;
        }
        for unit in first_unit..entry.cost {
            let kind = if plan.standard.len() < cap {
                SlotKind::Standard
            } else {
                SlotKind::Overspend
            };
            let slot = Slot {
                kind,
                entry_index,
                unit,
            };
            match kind {
                SlotKind::Standard => plan.standard.push(slot),
                _ => plan.overspend.push(slot),
            }
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryKind;

    fn entry(id: &str, cost: u32, eligible: bool) -> ActionLogEntry {
        ActionLogEntry::new(id, id, cost, EntryKind::Standard).with_quickened_eligible(eligible)
    }

    #[test]
    fn quickened_slot_takes_first_eligible_unit() {
        let entries = vec![
            entry("cast", 2, false),
            entry("stride", 1, true),
            entry("strike", 1, true),
        ];
        let plan = allocate(&entries, true);
        assert_eq!(plan.quickened.map(|s| s.entry_index), Some(1));
        assert_eq!(plan.standard.len(), 3);
        assert_eq!(plan.standard[2].entry_index, 2);
        assert!(!plan.is_overspent());
    }

    #[test]
    fn extra_units_overspend() {
        let entries = vec![
            entry("cast", 2, false),
            entry("strike", 1, true),
            ActionLogEntry::new("aoo", "AoO", 1, EntryKind::Reaction),
            entry("stride", 2, true),
        ];
        let plan = allocate(&entries, false);
        assert!(plan.quickened.is_none());
        assert_eq!(plan.standard.len(), 3);
        assert_eq!(plan.overspend.len(), 2);
        assert_eq!(plan.overspend[0].entry_index, 3);
        assert_eq!(plan.overspend[1].unit, 1);
        assert_eq!(plan.unspent_standard(), 0);
    }

    #[test]
    fn empty_plan_has_three_open_slots() {
        let plan = allocate(&[], true);
        assert_eq!(plan.unspent_standard(), 3);
        assert!(plan.quickened.is_none());
    }
}
