//! Economy checks run after ledger mutations and at end of turn.
use crate::config::Setting;
use crate::env::SettingsOracle;
use crate::ids::ActorId;
use crate::ledger::Ledger;
use crate::turn::TurnSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlertCategory {
    #[strum(serialize = "Economy Alert")]
    Overspend,
    #[strum(serialize = "Economy Alert")]
    ReactionOverspend,
    #[strum(serialize = "Economy")]
    Underspend,
    #[strum(serialize = "Undo Correction")]
    UndoCorrection,
}

/// A notification for the actor's owners and the authority.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    pub actor: ActorId,
    pub category: AlertCategory,
    pub message: String,
}

impl Alert {
    pub fn new(actor: ActorId, category: AlertCategory, message: impl Into<String>) -> Self {
        Self {
            actor,
            category,
            message: message.into(),
        }
    }

    /// A non-move entry had to be rolled back to honour a movement undo.
    pub fn undo_correction(actor: ActorId, label: &str, full_clear: bool) -> Self {
        let message = if full_clear {
            format!(
                "Movement undo detected. To maintain turn integrity, the following action was reverted: {label}"
            )
        } else {
            format!("Movement undo detected. Reverted: {label}")
        };
        Self::new(actor, AlertCategory::UndoCorrection, message)
    }
}

/// Stateless checks gated by the alert settings.
pub struct EconomyMonitor<'a> {
    settings: &'a dyn SettingsOracle,
}

impl<'a> EconomyMonitor<'a> {
    pub fn new(settings: &'a dyn SettingsOracle) -> Self {
        Self { settings }
    }

    /// Raises an overspend alert when the non-reaction total breaks the cap,
    /// or fills exactly a quickened cap without an eligible entry. Alerts only
    /// fire above the ledger's watermark, which then moves up.
    pub fn check_overspend(
        &self,
        ledger: &mut Ledger,
        actor: &ActorId,
        name: &str,
        snapshot: TurnSnapshot,
    ) -> Option<Alert> {
        if !self.settings.enabled(Setting::Overspend) {
            return None;
        }
        let cap = snapshot.action_cap();
        let spent = ledger.actions_spent();

        let reason = if spent > cap {
            format!("Spent {spent} actions (Max: {cap})")
        } else if spent == cap && snapshot.is_quickened && !ledger.has_eligible_spend() {
            "Bonus action used for an ineligible activity (e.g., must be Stride/Strike).".to_owned()
        } else {
            return None;
        };

        if spent <= ledger.last_overspend_alert() {
            return None;
        }
        ledger.record_overspend_alert(spent);
        Some(Alert::new(
            actor.clone(),
            AlertCategory::Overspend,
            format!("{name}: {reason}"),
        ))
    }

    /// Fires on every check while the reaction count exceeds the maximum.
    pub fn check_reaction_overspend(
        &self,
        ledger: &Ledger,
        actor: &ActorId,
        name: &str,
        max_reactions: u32,
    ) -> Option<Alert> {
        if !self.settings.enabled(Setting::ReactionOverspend) {
            return None;
        }
        let count = ledger.reaction_count();
        (count > max_reactions as usize).then(|| {
            Alert::new(
                actor.clone(),
                AlertCategory::ReactionOverspend,
                format!("{name}: Spent {count} reactions with only {max_reactions} available."),
            )
        })
    }

    /// End-of-turn shortfall report.
    pub fn check_underspend(
        &self,
        ledger: &Ledger,
        actor: &ActorId,
        name: &str,
        snapshot: TurnSnapshot,
    ) -> Option<Alert> {
        if !self.settings.enabled(Setting::Underspend) {
            return None;
        }
        let cap = snapshot.action_cap();
        let spent = ledger.budget_spent();
        (spent < cap).then(|| {
            Alert::new(
                actor.clone(),
                AlertCategory::Underspend,
                format!(
                    "{name} ended turn with {} actions/bonus actions remaining.",
                    cap - spent
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AlertSettings;
    use crate::entry::{ActionLogEntry, EntryKind};
    use proptest::prelude::*;

    fn actor() -> ActorId {
        ActorId::from("a1")
    }

    fn action(id: &str, cost: u32) -> ActionLogEntry {
        ActionLogEntry::new(id, id, cost, EntryKind::Standard)
    }

    #[test]
    fn overspend_fires_once_per_total() {
        let settings = AlertSettings::default();
        let monitor = EconomyMonitor::new(&settings);
        let mut ledger = Ledger::with_entries(vec![action("m1", 2), action("m2", 2)]);

        let alert = monitor
            .check_overspend(&mut ledger, &actor(), "Valeros", TurnSnapshot::default())
            .unwrap();
        assert_eq!(alert.category, AlertCategory::Overspend);
        assert_eq!(alert.message, "Valeros: Spent 4 actions (Max: 3)");
        assert_eq!(ledger.last_overspend_alert(), 4);

        assert!(
            monitor
                .check_overspend(&mut ledger, &actor(), "Valeros", TurnSnapshot::default())
                .is_none()
        );

        ledger.push(action("m3", 1));
        assert!(
            monitor
                .check_overspend(&mut ledger, &actor(), "Valeros", TurnSnapshot::default())
                .is_some()
        );
        assert_eq!(ledger.last_overspend_alert(), 5);
    }

    #[test]
    fn quickened_cap_requires_an_eligible_entry() {
        let settings = AlertSettings::default();
        let monitor = EconomyMonitor::new(&settings);
        let quickened = TurnSnapshot { is_quickened: true };

        let mut ineligible = Ledger::with_entries(vec![action("m1", 2), action("m2", 2)]);
        let alert = monitor
            .check_overspend(&mut ineligible, &actor(), "Kyra", quickened)
            .unwrap();
        assert!(alert.message.contains("ineligible"));

        let mut eligible = Ledger::with_entries(vec![
            action("m1", 2),
            action("m2", 1),
            action("m3", 1).with_quickened_eligible(true),
        ]);
        assert!(
            monitor
                .check_overspend(&mut eligible, &actor(), "Kyra", quickened)
                .is_none()
        );

        // Exactly the base cap is fine without quickened.
        let mut plain = Ledger::with_entries(vec![action("m1", 3)]);
        assert!(
            monitor
                .check_overspend(&mut plain, &actor(), "Kyra", TurnSnapshot::default())
                .is_none()
        );
    }

    #[test]
    fn reaction_overspend_repeats() {
        let settings = AlertSettings::default();
        let monitor = EconomyMonitor::new(&settings);
        let ledger = Ledger::with_entries(vec![
            ActionLogEntry::new("r1", "Shield Block", 1, EntryKind::Reaction),
            ActionLogEntry::new("r2", "Attack of Opportunity", 1, EntryKind::Reaction),
        ]);
        for _ in 0..2 {
            let alert = monitor
                .check_reaction_overspend(&ledger, &actor(), "Amiri", 1)
                .unwrap();
            assert_eq!(
                alert.message,
                "Amiri: Spent 2 reactions with only 1 available."
            );
        }
        assert!(
            monitor
                .check_reaction_overspend(&ledger, &actor(), "Amiri", 2)
                .is_none()
        );
    }

    #[test]
    fn underspend_counts_standard_and_system() {
        let settings = AlertSettings::default();
        let monitor = EconomyMonitor::new(&settings);
        let ledger = Ledger::with_entries(vec![
            ActionLogEntry::new(
                crate::ids::SourceId::action_drain(),
                "Slowed 1",
                1,
                EntryKind::System,
            ),
            action("m1", 1),
            ActionLogEntry::new("b1", "Bonus", 1, EntryKind::Bonus),
        ]);
        let alert = monitor
            .check_underspend(&ledger, &actor(), "Ezren", TurnSnapshot::default())
            .unwrap();
        assert_eq!(alert.category.to_string(), "Economy");
        assert_eq!(
            alert.message,
            "Ezren ended turn with 1 actions/bonus actions remaining."
        );
    }

    #[test]
    fn disabled_settings_silence_checks() {
        let settings = AlertSettings {
            overspend: false,
            reaction_overspend: false,
            underspend: false,
            sustain_reminder: true,
        };
        let monitor = EconomyMonitor::new(&settings);
        let mut ledger = Ledger::with_entries(vec![action("m1", 5)]);
        assert!(
            monitor
                .check_overspend(&mut ledger, &actor(), "x", TurnSnapshot::default())
                .is_none()
        );
        assert!(
            monitor
                .check_underspend(&Ledger::new(), &actor(), "x", TurnSnapshot::default())
                .is_none()
        );
    }

    proptest! {
        #[test]
        fn overspend_alerts_strictly_increase(costs in prop::collection::vec(0u32..3, 1..20)) {
            let settings = AlertSettings::default();
            let monitor = EconomyMonitor::new(&settings);
            let mut ledger = Ledger::new();
            let mut fired = Vec::new();
            for (n, cost) in costs.into_iter().enumerate() {
                ledger.push(action(&format!("m{n}"), cost));
                if monitor.check_overspend(&mut ledger, &actor(), "x", TurnSnapshot::default()).is_some() {
                    fired.push(ledger.actions_spent());
                }
            }
            prop_assert!(fired.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
