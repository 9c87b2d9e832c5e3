//! Actor oracle implementing [`tracker_core::ActorOracle`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracker_core::{ActorId, ActorOracle, Condition, TrackerConfig};

/// The slice of a creature sheet the tracker reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorSheet {
    pub name: String,
    #[serde(alias = "speed")]
    pub land_speed: u32,
    pub fly_speed: u32,
    /// Reactions per round; the rules default when absent.
    pub max_reactions: Option<u32>,
    pub conditions: HashMap<Condition, u32>,
}

impl ActorSheet {
    pub fn new(name: impl Into<String>, land_speed: u32) -> Self {
        Self {
            name: name.into(),
            land_speed,
            ..Self::default()
        }
    }

    pub fn with_fly_speed(mut self, fly_speed: u32) -> Self {
        self.fly_speed = fly_speed;
        self
    }

    pub fn with_reactions(mut self, reactions: u32) -> Self {
        self.max_reactions = Some(reactions);
        self
    }

    pub fn with_condition(mut self, condition: Condition, value: u32) -> Self {
        self.conditions.insert(condition, value);
        self
    }
}

/// Actor sheets held in memory. Condition writes from turn starts land here.
#[derive(Default)]
pub struct ActorOracleImpl {
    sheets: RwLock<HashMap<ActorId, ActorSheet>>,
}

impl ActorOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an actor sheet.
    pub fn insert(&self, actor: impl Into<ActorId>, sheet: ActorSheet) {
        self.sheets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(actor.into(), sheet);
    }

    pub fn with_actor(self, actor: impl Into<ActorId>, sheet: ActorSheet) -> Self {
        self.insert(actor, sheet);
        self
    }

    pub fn sheet(&self, actor: &ActorId) -> Option<ActorSheet> {
        self.sheets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(actor)
            .cloned()
    }

    pub fn contains(&self, actor: &ActorId) -> bool {
        self.sheets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(actor)
    }

    pub fn len(&self) -> usize {
        self.sheets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ActorOracle for ActorOracleImpl {
    fn condition_value(&self, actor: &ActorId, condition: Condition) -> u32 {
        self.sheets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(actor)
            .and_then(|sheet| sheet.conditions.get(&condition).copied())
            .unwrap_or(0)
    }

    fn set_condition_value(&self, actor: &ActorId, condition: Condition, value: u32) {
        let mut sheets = self.sheets.write().unwrap_or_else(PoisonError::into_inner);
        let Some(sheet) = sheets.get_mut(actor) else {
            return;
        };
        if value == 0 {
            sheet.conditions.remove(&condition);
        } else {
            sheet.conditions.insert(condition, value);
        }
    }

    fn max_reactions(&self, actor: &ActorId) -> u32 {
        self.sheets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(actor)
            .and_then(|sheet| sheet.max_reactions)
            .unwrap_or(TrackerConfig::DEFAULT_REACTIONS)
    }

    fn speed(&self, actor: &ActorId, flying: bool) -> u32 {
        self.sheets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(actor)
            .map(|sheet| if flying { sheet.fly_speed } else { sheet.land_speed })
            .unwrap_or(0)
    }

    fn display_name(&self, actor: &ActorId) -> Option<String> {
        self.sheets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(actor)
            .map(|sheet| sheet.name.clone())
            .filter(|name| !name.is_empty())
    }
}
