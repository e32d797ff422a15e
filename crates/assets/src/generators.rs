//! Built-in generators.

use glam::{Vec2, Vec3};
use rand::{Rng, RngCore};
use skyline_common::{ConfigError, Transform};
use skyline_layout::{Footprint, WeightSpec};

use crate::factory::{
    ArcAxis, AssetFactory, AssetKind, BuildingStyle, PlacedContent, Placement, PlacementContext,
};

/// Footprint forced at the outer columns of every road row.
const ROAD_BLOCKER: Footprint = Footprint {
    width: 5,
    height: 4,
};
const ROAD_BLOCKER_SHIFT: f32 = 10.0;
/// Windowed buildings are only used this many columns either side of centre.
const WINDOWED_SPAN: f32 = 5.0;
const WINDOWED_SHIFT: f32 = 0.5;
const WINDOWED_EXTRA_HEIGHT: u32 = 2;

/// City blocks: one building per footprint.
///
/// The outer columns of each road row hold a large building so the road
/// reads as closed off. Narrow, short buildings near the centre line get
/// windows and are nudged forward; everything right of centre faces back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCity;

impl AssetFactory for ColorCity {
    fn name(&self) -> &str {
        "color_city"
    }

    fn place(&self, ctx: &PlacementContext<'_>, _rng: &mut dyn RngCore) -> Placement {
        let mut footprint = ctx.footprint();
        let mut shift = Vec2::ZERO;

        let period = (ctx.layout.block_z + ctx.layout.gap_width).saturating_sub(1);
        let edge_column = ctx.cell.x == 0 || ctx.cell.x + 1 == ctx.total_x;
        if period > 0 && ctx.cell.z % period == 0 && edge_column {
            footprint = ROAD_BLOCKER;
            shift.x = ROAD_BLOCKER_SHIFT;
        }
        if footprint.is_empty() {
            return Placement::empty();
        }

        let near_center = (ctx.cell.x as f32 - ctx.center_x()).abs() < WINDOWED_SPAN;
        let style = if footprint.width < 3 && footprint.height < 4 && near_center {
            footprint.height += WINDOWED_EXTRA_HEIGHT;
            shift = Vec2::splat(WINDOWED_SHIFT);
            BuildingStyle::Windowed
        } else {
            BuildingStyle::Shaded
        };

        let mut yaw = 0.0;
        if ctx.is_right_side() {
            yaw = 180.0;
            shift.x = -shift.x;
        }

        // Z shift points back toward the viewer.
        let offset = Vec3::new(-shift.x, 0.0, -ctx.direction.sign() * shift.y);
        Placement::with(PlacedContent {
            kind: AssetKind::Building { style },
            footprint,
            transform: Transform::at(ctx.local_position + offset).with_yaw_degrees(yaw),
        })
    }
}

/// Distance the load bar moves per placed cell, pacing the load.
const MOVING_PACING: f32 = 5.0;
/// Robots start their walk this far ahead of their row.
const ROBOT_LEAD: f32 = 100.0;
const ROBOT_OFFSET: f32 = 208.0;
const ROBOT_HEIGHT: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    ArcY,
    ArcX,
    Flower,
    Sine,
}

/// Animated street furniture, one structure per cell regardless of
/// footprint. The first cell of a row may instead hold a robot that spans
/// the whole row.
#[derive(Debug, Clone)]
pub struct MovingCity {
    motions: WeightSpec<Motion>,
    sine_heights: WeightSpec<u32>,
}

impl MovingCity {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            motions: WeightSpec::labelled(
                "moving city motions",
                vec![Motion::ArcY, Motion::ArcX, Motion::Flower, Motion::Sine],
                vec![0, 0, 0, 1],
            )?,
            sine_heights: WeightSpec::labelled("sine heights", vec![1, 2, 3], vec![3, 2, 1])?,
        })
    }
}

impl AssetFactory for MovingCity {
    fn name(&self) -> &str {
        "moving_city"
    }

    fn place(&self, ctx: &PlacementContext<'_>, rng: &mut dyn RngCore) -> Placement {
        let start = ctx.world_position().z;
        let placement = Placement::empty().deferring_load_bar(MOVING_PACING);

        if ctx.cell.x == 0 && rng.random_bool(0.5) {
            let reverse = rng.random_bool(0.5);
            let x_offset = if reverse {
                -ROBOT_OFFSET / 2.0 + 8.0
            } else {
                ROBOT_OFFSET
            };
            // The robot takes the row; orientation follows its last column.
            let yaw = if (ctx.total_x.saturating_sub(1)) as f32 >= ctx.center_x() {
                180.0
            } else {
                0.0
            };
            let content = PlacedContent {
                kind: AssetKind::Robot {
                    reverse,
                    start: ctx.direction.advance(start, ROBOT_LEAD),
                },
                footprint: Footprint {
                    width: 1,
                    height: ROBOT_HEIGHT,
                },
                transform: Transform::at(ctx.local_position + Vec3::new(x_offset, 0.0, 0.0))
                    .with_yaw_degrees(yaw),
            };
            return Placement {
                content: Some(content),
                ..placement
            }
            .finishing_row();
        }

        let (kind, height) = match *self.motions.sample(rng) {
            Motion::ArcY => (AssetKind::Arc { axis: ArcAxis::Y }, 1),
            Motion::ArcX => (AssetKind::Arc { axis: ArcAxis::X }, rng.random_range(1..=2)),
            Motion::Flower => (AssetKind::Flower, rng.random_range(1..=2)),
            Motion::Sine => (AssetKind::Sine { start }, *self.sine_heights.sample(rng)),
        };
        let yaw = if ctx.is_right_side() { 180.0 } else { 0.0 };
        Placement {
            content: Some(PlacedContent {
                kind,
                footprint: Footprint { width: 1, height },
                transform: Transform::at(ctx.local_position).with_yaw_degrees(yaw),
            }),
            ..placement
        }
    }
}

/// A plain block scaled to its footprint.
#[derive(Debug, Clone, Copy, Default)]
pub struct FootprintBlocks;

impl AssetFactory for FootprintBlocks {
    fn name(&self) -> &str {
        "footprint"
    }

    fn place(&self, ctx: &PlacementContext<'_>, _rng: &mut dyn RngCore) -> Placement {
        let footprint = ctx.footprint();
        if footprint.is_empty() {
            return Placement::empty();
        }
        let mut transform = Transform::at(ctx.local_position);
        transform.scale = Vec3::new(
            footprint.width as f32,
            footprint.height as f32,
            footprint.width as f32,
        );
        Placement::with(PlacedContent {
            kind: AssetKind::Block,
            footprint,
            transform,
        })
    }
}

/// Places nothing; rows are still created and streamed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl AssetFactory for Empty {
    fn name(&self) -> &str {
        "empty"
    }

    fn place(&self, _ctx: &PlacementContext<'_>, _rng: &mut dyn RngCore) -> Placement {
        Placement::empty()
    }
}
