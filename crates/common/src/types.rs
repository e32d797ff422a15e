use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A cell coordinate in a placement grid. `x` indexes columns, `z` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: usize,
    pub z: usize,
}

impl GridCoord {
    pub fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Translation only.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Translation plus a rotation about +Y, in degrees.
    pub fn with_yaw_degrees(mut self, degrees: f32) -> Self {
        self.rotation = Quat::from_rotation_y(degrees.to_radians());
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Direction the viewer moves along the Z travel axis.
///
/// The default matches a camera flying toward -Z, so "passing" a threshold
/// means dropping below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelDirection {
    #[default]
    NegativeZ,
    PositiveZ,
}

impl TravelDirection {
    /// Unit step along the travel axis: -1.0 or +1.0.
    pub fn sign(self) -> f32 {
        match self {
            Self::NegativeZ => -1.0,
            Self::PositiveZ => 1.0,
        }
    }

    /// Whether `position` lies beyond `threshold` in the direction of travel.
    pub fn has_passed(self, position: f32, threshold: f32) -> bool {
        match self {
            Self::NegativeZ => position < threshold,
            Self::PositiveZ => position > threshold,
        }
    }

    /// Move `value` forward along the travel axis by `distance`.
    pub fn advance(self, value: f32, distance: f32) -> f32 {
        value + self.sign() * distance
    }
}
