//! Encounter roster implementing [`tracker_core::RosterOracle`].

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use tracker_core::{ActorId, CombatantId, RosterOracle};

/// Combatant to actor mapping for one encounter.
#[derive(Default)]
pub struct RosterOracleImpl {
    combatants: RwLock<BTreeMap<CombatantId, ActorId>>,
}

impl RosterOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, combatant: impl Into<CombatantId>, actor: impl Into<ActorId>) {
        self.combatants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(combatant.into(), actor.into());
    }

    pub fn with_combatant(
        self,
        combatant: impl Into<CombatantId>,
        actor: impl Into<ActorId>,
    ) -> Self {
        self.insert(combatant, actor);
        self
    }

    pub fn remove(&self, combatant: &CombatantId) -> Option<ActorId> {
        self.combatants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(combatant)
    }
}

impl RosterOracle for RosterOracleImpl {
    fn combatant_for_actor(&self, actor: &ActorId) -> Option<CombatantId> {
        self.combatants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(_, candidate)| *candidate == actor)
            .map(|(combatant, _)| combatant.clone())
    }

    fn actor_for_combatant(&self, combatant: &CombatantId) -> Option<ActorId> {
        self.combatants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(combatant)
            .cloned()
    }

    fn combatants(&self) -> Vec<CombatantId> {
        self.combatants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
