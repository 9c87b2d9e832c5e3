//! Plain-text rendering of tracker events and ledgers.
use runtime::{Event, LedgerEvent};
use tracker_core::{ActionLogEntry, CombatantId, Ledger, SlotPlan};

/// One line per event; turn starts also list their drains.
pub fn describe(event: &Event) -> String {
    match event {
        Event::Alert(alert) => format!("[{}] {}", alert.category, alert.message),
        Event::Reminder(reminder) => format!(
            "[Sustain] {} is sustaining {} ({})",
            reminder.actor, reminder.item_name, reminder.item_id
        ),
        Event::Ledger(event) => match event {
            LedgerEvent::EntryAdded { combatant, entry } => {
                format!("  {combatant} + {}", entry_line(entry))
            }
            LedgerEvent::EntryEdited { combatant, entry } => {
                format!("  {combatant} ~ {}", entry_line(entry))
            }
            LedgerEvent::EntryRemoved { combatant, entry } => {
                format!("  {combatant} - {}", entry_line(entry))
            }
            LedgerEvent::TurnStarted {
                combatant,
                snapshot,
                drains,
            } => {
                let mut line = format!("== {combatant} starts turn");
                if snapshot.is_quickened {
                    line.push_str(" (quickened)");
                }
                for drain in drains {
                    line.push_str(&format!("\n  {combatant} + {}", entry_line(drain)));
                }
                line
            }
            LedgerEvent::TurnEnded { combatant } => format!("== {combatant} ends turn"),
            LedgerEvent::SustainRenewed { actor, item } => {
                format!("[Sustain] {actor} sustains {}", item.name)
            }
            LedgerEvent::SustainLapsed {
                actor,
                item_id,
                item_name,
            } => format!(
                "[Sustain] {actor} stops sustaining {}",
                item_name.as_deref().unwrap_or(item_id.as_str())
            ),
            LedgerEvent::EncounterEnded => "== encounter ended".to_owned(),
        },
    }
}

pub fn entry_line(entry: &ActionLogEntry) -> String {
    let mut line = format!("{} [{}, cost {}]", entry.label, entry.kind, entry.cost);
    if let Some(item) = &entry.sustained_item {
        line.push_str(&format!(" sustaining {}", item.name));
    }
    line
}

/// Final per-combatant summary.
pub fn ledger_summary(combatant: &CombatantId, ledger: &Ledger, slots: &SlotPlan) -> String {
    let mut out = format!(
        "{combatant}: {} actions, {} reactions",
        ledger.actions_spent(),
        ledger.reaction_count()
    );
    if slots.quickened.is_some() {
        out.push_str(", quickened slot used");
    }
    if slots.is_overspent() {
        out.push_str(&format!(", {} over", slots.overspend.len()));
    }
    for entry in ledger.entries() {
        out.push_str(&format!("\n    {}", entry_line(entry)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::{Alert, AlertCategory, EntryKind};

    #[test]
    fn alerts_show_their_category() {
        let alert = Alert::new(
            "a1".into(),
            AlertCategory::Overspend,
            "Valeros: Spent 4 actions (Max: 3)",
        );
        assert_eq!(
            describe(&Event::Alert(alert)),
            "[Economy Alert] Valeros: Spent 4 actions (Max: 3)"
        );
    }

    #[test]
    fn summary_lists_entries_in_order() {
        let ledger = Ledger::with_entries(vec![
            ActionLogEntry::new("m1", "Strike", 1, EntryKind::Standard),
            ActionLogEntry::new("r1", "Shield Block", 0, EntryKind::Reaction),
        ]);
        let summary = ledger_summary(
            &CombatantId::from("c1"),
            &ledger,
            &ledger.allocate_slots(false),
        );
        assert_eq!(
            summary,
            "c1: 1 actions, 1 reactions\n    Strike [standard, cost 1]\n    Shield Block [reaction, cost 0]"
        );
    }
}
