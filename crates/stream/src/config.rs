use glam::Vec3;
use serde::{Deserialize, Serialize};
use skyline_common::{ConfigError, TravelDirection};

/// Streaming configuration: where the world sits, when it loads, follows
/// and unloads, and how much loading work one advance may do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Asset factory invoked for every cell while loading.
    pub factory: String,
    /// World units between neighbouring grid points.
    pub grid_spacing: f32,
    /// World position of the grid's row 0.
    pub origin: Vec3,
    pub direction: TravelDirection,
    /// How early loading starts, as a multiple of the world's Z extent
    /// ahead of the origin. 1.0 starts at the near edge.
    pub load_mult: f32,
    /// Absolute Z past which rows stop following the viewer.
    pub stop_follow: f32,
    /// Signed Z offset from the origin at which the world is torn down.
    pub unload_offset: f32,
    /// Maximum factory calls per advance.
    pub cells_per_advance: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            factory: "color_city".into(),
            grid_spacing: 5.0,
            origin: Vec3::ZERO,
            direction: TravelDirection::default(),
            load_mult: 1.0,
            stop_follow: 0.0,
            unload_offset: -1000.0,
            cells_per_advance: 1,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_spacing.is_finite() && self.grid_spacing > 0.0) {
            return Err(ConfigError::invalid(
                "grid_spacing",
                format!("must be positive and finite, got {}", self.grid_spacing),
            ));
        }
        if self.cells_per_advance == 0 {
            return Err(ConfigError::invalid("cells_per_advance", "must be at least 1"));
        }
        if !(self.load_mult.is_finite() && self.load_mult >= 0.0) {
            return Err(ConfigError::invalid(
                "load_mult",
                format!("must be non-negative and finite, got {}", self.load_mult),
            ));
        }
        if !self.origin.is_finite() || !self.stop_follow.is_finite() || !self.unload_offset.is_finite() {
            return Err(ConfigError::invalid(
                "thresholds",
                "origin, stop_follow and unload_offset must be finite",
            ));
        }
        if self.factory.is_empty() {
            return Err(ConfigError::invalid("factory", "must name an asset factory"));
        }
        Ok(())
    }

    /// Initial thresholds for a world `total_z` rows deep.
    pub fn thresholds(&self, total_z: usize) -> Thresholds {
        let extent = total_z.saturating_sub(1) as f32 * self.grid_spacing;
        let dir = self.direction;
        Thresholds {
            load_bar: dir.advance(self.origin.z, -self.load_mult * extent),
            follow_center: dir.advance(self.origin.z, -extent / 2.0),
            stop_follow_at: dir.advance(self.stop_follow, -extent / 2.0),
            unload_at: self.origin.z + self.unload_offset,
        }
    }
}

/// Positions on the travel axis that drive the world's transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Loading proceeds while the viewer is past this.
    pub load_bar: f32,
    /// Rows recycle while the viewer is past this; moves one spacing per recycle.
    pub follow_center: f32,
    /// Past this, recycling stops for good.
    pub stop_follow_at: f32,
    /// Past this, the world is hidden and then released.
    pub unload_at: f32,
}
