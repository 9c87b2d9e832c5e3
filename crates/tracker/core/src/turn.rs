//! Turn boundaries: quickened snapshot and start-of-turn drains.
use crate::config::TrackerConfig;
use crate::entry::{ActionLogEntry, EntryKind};
use crate::env::{ActorOracle, Condition};
use crate::ids::{ActorId, CombatantId, SourceId};

/// Captured once when a turn starts; fixed for the rest of the turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnSnapshot {
    pub is_quickened: bool,
}

impl TurnSnapshot {
    pub fn capture(actors: &dyn ActorOracle, actor: &ActorId) -> Self {
        Self {
            is_quickened: actors.has_condition(actor, Condition::Quickened),
        }
    }

    pub fn action_cap(self) -> u32 {
        if self.is_quickened {
            TrackerConfig::QUICKENED_ACTION_CAP
        } else {
            TrackerConfig::BASE_ACTION_CAP
        }
    }

    pub fn is_quickened_eligible(self, slug: &str) -> bool {
        self.is_quickened && TrackerConfig::is_quickened_eligible(slug)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    #[default]
    Idle,
    ActorTurnActive(CombatantId),
}

impl TurnPhase {
    pub fn active(&self) -> Option<&CombatantId> {
        match self {
            TurnPhase::Idle => None,
            TurnPhase::ActorTurnActive(combatant) => Some(combatant),
        }
    }

    pub fn is_active(&self, combatant: &CombatantId) -> bool {
        self.active() == Some(combatant)
    }
}

/// Condition magnitudes read at turn start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConditionReadout {
    pub stunned: u32,
    pub slowed: u32,
    pub paralyzed: bool,
}

impl ConditionReadout {
    pub fn read(actors: &dyn ActorOracle, actor: &ActorId) -> Self {
        Self {
            stunned: actors.condition_value(actor, Condition::Stunned),
            slowed: actors.condition_value(actor, Condition::Slowed),
            paralyzed: actors.has_condition(actor, Condition::Paralyzed),
        }
    }
}

/// Everything `start_turn` writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnStartPlan {
    pub snapshot: TurnSnapshot,
    /// System drains that seed the new ledger.
    pub drains: Vec<ActionLogEntry>,
    /// New stunned value, when stunned must be decremented.
    pub stunned_after: Option<u32>,
}

pub fn plan_turn_start(snapshot: TurnSnapshot, conditions: ConditionReadout) -> TurnStartPlan {
    let cap = snapshot.action_cap();
    let ConditionReadout {
        stunned,
        slowed,
        paralyzed,
    } = conditions;

    let mut drains = Vec::new();
    let drain = if paralyzed { cap } else { stunned.max(slowed) }.min(cap);
    if drain > 0 {
        let label = if paralyzed {
            "Paralyzed".to_owned()
        } else if stunned > 0 && slowed > 0 {
            format!("Stunned {stunned} & Slowed {slowed}")
        } else if stunned > 0 {
            format!("Stunned {stunned}")
        } else {
            format!("Slowed {slowed}")
        };
        drains.push(
            ActionLogEntry::new(SourceId::action_drain(), label, drain, EntryKind::System)
                .with_quickened_eligible(true),
        );
    }

    if paralyzed || stunned > 0 {
        let cause = if paralyzed { "Paralyzed" } else { "Stunned" };
        drains.push(ActionLogEntry::new(
            SourceId::reaction_drain(),
            format!("{cause}: Reaction Lost"),
            1,
            EntryKind::Reaction,
        ));
    }

    let stunned_after = (stunned > 0).then(|| stunned - stunned.min(cap));

    TurnStartPlan {
        snapshot,
        drains,
        stunned_after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readout(stunned: u32, slowed: u32, paralyzed: bool) -> ConditionReadout {
        ConditionReadout {
            stunned,
            slowed,
            paralyzed,
        }
    }

    #[test]
    fn quickened_snapshot_sets_cap() {
        assert_eq!(TurnSnapshot { is_quickened: true }.action_cap(), 4);
        assert_eq!(TurnSnapshot::default().action_cap(), 3);
        assert!(TurnSnapshot { is_quickened: true }.is_quickened_eligible("Strike"));
        assert!(!TurnSnapshot::default().is_quickened_eligible("strike"));
    }

    #[test]
    fn clean_turn_has_no_drains() {
        let plan = plan_turn_start(TurnSnapshot::default(), ConditionReadout::default());
        assert!(plan.drains.is_empty());
        assert_eq!(plan.stunned_after, None);
    }

    #[test]
    fn stunned_and_slowed_drain_the_larger() {
        let plan = plan_turn_start(TurnSnapshot::default(), readout(1, 2, false));
        assert_eq!(plan.drains.len(), 2);
        assert_eq!(plan.drains[0].label, "Stunned 1 & Slowed 2");
        assert_eq!(plan.drains[0].cost, 2);
        assert_eq!(plan.drains[0].kind, EntryKind::System);
        assert_eq!(plan.drains[1].label, "Stunned: Reaction Lost");
        assert!(plan.drains[1].is_reaction());
        assert_eq!(plan.stunned_after, Some(0));
    }

    #[test]
    fn stunned_beyond_cap_carries_over() {
        let plan = plan_turn_start(TurnSnapshot::default(), readout(5, 0, false));
        assert_eq!(plan.drains[0].cost, 3);
        assert_eq!(plan.stunned_after, Some(2));

        let quickened = plan_turn_start(TurnSnapshot { is_quickened: true }, readout(5, 0, false));
        assert_eq!(quickened.drains[0].cost, 4);
        assert_eq!(quickened.stunned_after, Some(1));
    }

    #[test]
    fn slowed_alone_keeps_the_reaction() {
        let plan = plan_turn_start(TurnSnapshot::default(), readout(0, 1, false));
        assert_eq!(plan.drains.len(), 1);
        assert_eq!(plan.drains[0].label, "Slowed 1");
    }

    #[test]
    fn paralysis_drains_everything() {
        let plan = plan_turn_start(TurnSnapshot { is_quickened: true }, readout(0, 1, true));
        assert_eq!(plan.drains[0].label, "Paralyzed");
        assert_eq!(plan.drains[0].cost, 4);
        assert_eq!(plan.drains[1].label, "Paralyzed: Reaction Lost");
    }

    #[test]
    fn active_phase() {
        let phase = TurnPhase::ActorTurnActive(CombatantId::from("c1"));
        assert!(phase.is_active(&CombatantId::from("c1")));
        assert!(!TurnPhase::Idle.is_active(&CombatantId::from("c1")));
    }
}
