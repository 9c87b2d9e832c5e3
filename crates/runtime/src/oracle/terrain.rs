//! Square-grid terrain oracle implementing [`tracker_core::TerrainOracle`].

use serde::{Deserialize, Serialize};
use tracker_core::{PathPoint, Terrain, TerrainOracle, TrackerConfig};

/// Axis-aligned region of non-normal terrain, in scene units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub terrain: Terrain,
}

impl Hazard {
    pub fn contains(&self, point: PathPoint) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// Grid measurement with alternating diagonals (every second diagonal costs
/// double), counted across the whole path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainOracleImpl {
    /// Scene units per grid square.
    pub grid_size: f64,
    /// Feet per grid square.
    pub grid_distance: u32,
    pub hazards: Vec<Hazard>,
}

impl Default for TerrainOracleImpl {
    fn default() -> Self {
        Self {
            grid_size: 100.0,
            grid_distance: TrackerConfig::STEP_DISTANCE,
            hazards: Vec::new(),
        }
    }
}

impl TerrainOracleImpl {
    pub fn new(grid_size: f64) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    pub fn with_hazard(mut self, hazard: Hazard) -> Self {
        self.hazards.push(hazard);
        self
    }

    fn squares(&self, delta: f64) -> u32 {
        (delta.abs() / self.grid_size).round() as u32
    }
}

impl TerrainOracle for TerrainOracleImpl {
    fn measure_path(&self, points: &[PathPoint]) -> u32 {
        if self.grid_size <= 0.0 {
            return 0;
        }
        let mut diagonals = 0u32;
        let mut squares = 0u32;
        for pair in points.windows(2) {
            let dx = self.squares(pair[1].x - pair[0].x);
            let dy = self.squares(pair[1].y - pair[0].y);
            let diagonal = dx.min(dy);
            let straight = dx.max(dy) - diagonal;
            let doubled = (diagonals + diagonal) / 2 - diagonals / 2;
            diagonals += diagonal;
            squares += straight + diagonal + doubled;
        }
        squares * self.grid_distance
    }

    fn terrain_at(&self, point: PathPoint) -> Terrain {
        // Later hazards take precedence over earlier ones.
        self.hazards
            .iter()
            .rev()
            .find(|hazard| hazard.contains(point))
            .map(|hazard| hazard.terrain)
            .unwrap_or_default()
    }
}
