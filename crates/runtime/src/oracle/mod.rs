//! Collaborator oracles the tracker reads host data through.
//!
//! The in-memory implementations here back tests and scenario replay. Hosts
//! with their own data model plug trait objects into [`OracleManager`]
//! instead.
mod actors;
mod roster;
mod terrain;

use std::sync::Arc;

use tracker_core::{ActorOracle, AlertSettings, RosterOracle, SettingsOracle, TerrainOracle};

use crate::authority::SessionOracle;

pub use actors::{ActorOracleImpl, ActorSheet};
pub use roster::RosterOracleImpl;
pub use terrain::{Hazard, TerrainOracleImpl};

/// Bundles every oracle the runtime consults.
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) actors: Arc<dyn ActorOracle>,
    pub(crate) terrain: Arc<dyn TerrainOracle>,
    pub(crate) roster: Arc<dyn RosterOracle>,
    pub(crate) session: Arc<dyn SessionOracle>,
    pub(crate) settings: Arc<dyn SettingsOracle>,
}

impl OracleManager {
    /// Creates a manager with alert settings left at their defaults.
    pub fn new(
        actors: Arc<dyn ActorOracle>,
        terrain: Arc<dyn TerrainOracle>,
        roster: Arc<dyn RosterOracle>,
        session: Arc<dyn SessionOracle>,
    ) -> Self {
        Self {
            actors,
            terrain,
            roster,
            session,
            settings: Arc::new(AlertSettings::default()),
        }
    }

    pub fn with_settings(mut self, settings: Arc<dyn SettingsOracle>) -> Self {
        self.settings = settings;
        self
    }

    pub fn actors(&self) -> &dyn ActorOracle {
        self.actors.as_ref()
    }

    pub fn terrain(&self) -> &dyn TerrainOracle {
        self.terrain.as_ref()
    }

    pub fn roster(&self) -> &dyn RosterOracle {
        self.roster.as_ref()
    }

    pub fn session(&self) -> &dyn SessionOracle {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &dyn SettingsOracle {
        self.settings.as_ref()
    }
}
