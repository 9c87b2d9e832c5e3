//! Traits describing the host data the tracker reads.
//!
//! Oracles expose actor conditions and speeds, terrain measurement, the
//! encounter roster and alert toggles. Concrete implementations live in the
//! runtime; the core only ever sees these traits.
use crate::config::{AlertSettings, Setting, TrackerConfig};
use crate::ids::{ActorId, CombatantId};
use crate::signal::PathPoint;

/// Conditions the tracker reads or writes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Condition {
    Stunned,
    Slowed,
    Paralyzed,
    Quickened,
}

/// Actor sheet lookups.
pub trait ActorOracle: Send + Sync {
    /// Numeric magnitude of `condition`; 0 when absent.
    fn condition_value(&self, actor: &ActorId, condition: Condition) -> u32;

    fn has_condition(&self, actor: &ActorId, condition: Condition) -> bool {
        self.condition_value(actor, condition) > 0
    }

    /// Writes a condition magnitude back to the host. Zero removes it.
    fn set_condition_value(&self, actor: &ActorId, condition: Condition, value: u32);

    fn max_reactions(&self, actor: &ActorId) -> u32 {
        let _ = actor;
        TrackerConfig::DEFAULT_REACTIONS
    }

    /// Land speed, or fly speed when `flying`. Zero means the actor cannot move that way.
    fn speed(&self, actor: &ActorId, flying: bool) -> u32;

    fn display_name(&self, actor: &ActorId) -> Option<String> {
        let _ = actor;
        None
    }
}

/// Terrain class at a point.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Terrain {
    #[default]
    Normal,
    Difficult,
    GreaterDifficult,
}

impl Terrain {
    /// Feet added to a path ending in this terrain.
    pub fn surcharge(self) -> u32 {
        match self {
            Terrain::Normal => 0,
            Terrain::Difficult => TrackerConfig::DIFFICULT_SURCHARGE,
            Terrain::GreaterDifficult => TrackerConfig::GREATER_DIFFICULT_SURCHARGE,
        }
    }

    pub fn is_difficult(self) -> bool {
        !matches!(self, Terrain::Normal)
    }
}

/// Grid distance measurement and hazard lookup.
pub trait TerrainOracle: Send + Sync {
    /// Length in feet of the path through `points`, as the grid measures it.
    fn measure_path(&self, points: &[PathPoint]) -> u32;

    fn terrain_at(&self, point: PathPoint) -> Terrain;
}

/// Encounter membership.
pub trait RosterOracle: Send + Sync {
    fn combatant_for_actor(&self, actor: &ActorId) -> Option<CombatantId>;

    fn actor_for_combatant(&self, combatant: &CombatantId) -> Option<ActorId>;

    fn combatants(&self) -> Vec<CombatantId>;
}

/// Alert toggles queried by name.
pub trait SettingsOracle: Send + Sync {
    fn enabled(&self, setting: Setting) -> bool;
}

impl SettingsOracle for AlertSettings {
    fn enabled(&self, setting: Setting) -> bool {
        self.get(setting)
    }
}
