use glam::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use skyline_common::{GridCoord, Transform, TravelDirection};
use skyline_layout::{CellInfo, Footprint, LayoutConfig};

/// Generates the content for one grid cell while a world loads.
///
/// Implementations must not assume they see every cell: the loader skips the
/// rest of a row when a placement asks for it.
pub trait AssetFactory {
    /// Registry key, referenced by name from world configuration.
    fn name(&self) -> &str;

    /// Produce the content for `ctx.cell`, or nothing.
    fn place(&self, ctx: &PlacementContext<'_>, rng: &mut dyn RngCore) -> Placement;
}

/// What the loader knows about the cell being placed.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub cell: GridCoord,
    pub info: CellInfo,
    /// Cell position relative to the world origin, z-fighting jitter included.
    pub local_position: Vec3,
    pub origin: Vec3,
    pub total_x: usize,
    pub total_z: usize,
    pub layout: &'a LayoutConfig,
    pub direction: TravelDirection,
}

impl PlacementContext<'_> {
    pub fn footprint(&self) -> Footprint {
        self.info.footprint
    }

    pub fn world_position(&self) -> Vec3 {
        self.origin + self.local_position
    }

    /// Column of the centre line, ignoring road columns.
    pub fn center_x(&self) -> f32 {
        let roads = self.layout.num_block_x * self.layout.gap_width;
        self.total_x.saturating_sub(roads) as f32 / 2.0
    }

    /// Whether the cell sits on or right of the centre line.
    pub fn is_right_side(&self) -> bool {
        self.cell.x as f32 >= self.center_x()
    }
}

/// Style of a generated building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingStyle {
    /// Geometry with window cut-outs; sits in front of shaded neighbours.
    Windowed,
    /// Single shaded volume.
    Shaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcAxis {
    X,
    Y,
}

/// Kind of content placed in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AssetKind {
    Block,
    Building { style: BuildingStyle },
    Arc { axis: ArcAxis },
    Flower,
    /// Animated along the travel axis starting at `start`.
    Sine { start: f32 },
    Robot { reverse: bool, start: f32 },
}

/// A placed content handle, stored in its row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedContent {
    pub kind: AssetKind,
    pub footprint: Footprint,
    /// Relative to the owning row.
    pub transform: Transform,
}

/// Result of one factory call: optional content plus loader directives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Placement {
    pub content: Option<PlacedContent>,
    /// Skip the remaining cells of the current row.
    pub finish_row: bool,
    /// Move the load bar this far along the travel axis.
    pub defer_load_bar: f32,
}

impl Placement {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(content: PlacedContent) -> Self {
        Self {
            content: Some(content),
            ..Self::default()
        }
    }

    pub fn finishing_row(mut self) -> Self {
        self.finish_row = true;
        self
    }

    pub fn deferring_load_bar(mut self, distance: f32) -> Self {
        self.defer_load_bar = distance;
        self
    }
}
