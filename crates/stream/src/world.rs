use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skyline_assets::{AssetFactory, FactoryRegistry, PlacementContext};
use skyline_common::{ConfigError, GridCoord};
use skyline_layout::{LayoutConfig, PlacementGrid};

use crate::config::{StreamConfig, Thresholds};
use crate::rows::RowBuffer;

/// Spacing of the z-fighting jitter added at each row start.
const JITTER_STEP: f32 = 0.01;
/// Jitter multipliers cycle through `0..JITTER_CYCLE`.
const JITTER_CYCLE: u32 = 5;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    #[error("asset factory `{0}` is not registered")]
    MissingFactory(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Lifecycle of a streamed world. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamPhase {
    Loading,
    Following,
    Unloading,
    Retired,
}

impl fmt::Display for StreamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::Following => "following",
            Self::Unloading => "unloading",
            Self::Retired => "retired",
        };
        f.write_str(name)
    }
}

/// Signals returned from [`StreamingWorld::advance`], in the order the
/// transitions happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StreamEvent {
    /// The configured factory is missing; this world will never finish loading.
    LoadingHalted { factory: String },
    LoadingComplete { rows: usize, contents: usize },
    RowRepositioned { row: usize, from: Vec3, to: Vec3 },
    FollowStopped,
    Hidden,
    Retired { released_rows: usize },
}

/// Work done by the most recent advance, plus running totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStats {
    pub cells_loaded: usize,
    pub rows_recycled: usize,
    pub live_rows: usize,
    pub elapsed: Duration,
    pub total_cells_loaded: usize,
    pub total_rows_recycled: usize,
}

/// Where the loader is in the grid. Rows load from `total_z - 1` down to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LoadCursor {
    x: usize,
    z: usize,
    x_pos: f32,
    z_pos: f32,
    jitter: u32,
}

impl LoadCursor {
    fn new(total_z: usize, spacing: f32) -> Self {
        let z = total_z.saturating_sub(1);
        Self {
            x: 0,
            z,
            x_pos: 0.0,
            z_pos: z as f32 * spacing,
            jitter: 1,
        }
    }

    fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.z)
    }

    /// Move to the next cell. Returns false once the last row is done.
    fn step(&mut self, total_x: usize, spacing: f32) -> bool {
        self.x += 1;
        self.x_pos += spacing;
        if self.x >= total_x {
            return self.end_row(spacing);
        }
        true
    }

    /// Skip to the start of the next row. Returns false after row 0.
    ///
    /// The next row starts X at the current jitter; Z steps by the advanced one.
    fn end_row(&mut self, spacing: f32) -> bool {
        self.x = 0;
        self.x_pos = self.jitter as f32 * JITTER_STEP;
        self.jitter = (self.jitter + 1) % JITTER_CYCLE;
        if self.z == 0 {
            return false;
        }
        self.z -= 1;
        self.z_pos -= spacing + self.jitter as f32 * JITTER_STEP;
        true
    }
}

/// One world region streamed in front of a moving viewer.
///
/// Each [`advance`](Self::advance) does a bounded slice of work: a few
/// factory calls while loading, one row recycle while following, or one
/// lifecycle transition.
pub struct StreamingWorld {
    stream: StreamConfig,
    layout: LayoutConfig,
    grid: PlacementGrid,
    factory: Option<Arc<dyn AssetFactory>>,
    rng: ChaCha8Rng,
    phase: StreamPhase,
    thresholds: Thresholds,
    cursor: LoadCursor,
    rows: RowBuffer,
    visible: bool,
    halted: Option<StreamError>,
    frozen: bool,
    stats: StreamStats,
}

impl StreamingWorld {
    /// Wrap an already built grid. The factory is resolved here, once; a
    /// missing name only surfaces when loading first needs it.
    pub fn new(
        stream: StreamConfig,
        layout: LayoutConfig,
        grid: PlacementGrid,
        registry: &FactoryRegistry,
        rng: ChaCha8Rng,
    ) -> Result<Self, StreamError> {
        stream.validate()?;
        layout.validate()?;
        if layout.totals() != (grid.total_x(), grid.total_z()) {
            return Err(ConfigError::invalid(
                "grid",
                format!(
                    "grid is {}x{} but layout describes {:?}",
                    grid.total_x(),
                    grid.total_z(),
                    layout.totals()
                ),
            )
            .into());
        }

        let factory = registry.get(&stream.factory);
        if factory.is_none() {
            tracing::debug!(factory = %stream.factory, "asset factory not registered yet");
        }
        let total_z = grid.total_z();
        let thresholds = stream.thresholds(total_z);
        tracing::debug!(
            total_x = grid.total_x(),
            total_z,
            load_bar = thresholds.load_bar,
            unload_at = thresholds.unload_at,
            "streaming world created"
        );

        Ok(Self {
            cursor: LoadCursor::new(total_z, stream.grid_spacing),
            rows: RowBuffer::with_capacity(total_z),
            stream,
            layout,
            grid,
            factory,
            rng,
            phase: StreamPhase::Loading,
            thresholds,
            visible: false,
            halted: None,
            frozen: false,
            stats: StreamStats::default(),
        })
    }

    /// Build the grid from `layout` with a ChaCha8 stream seeded by `seed`,
    /// then wrap it. The same RNG continues into loading.
    pub fn build(
        stream: StreamConfig,
        layout: LayoutConfig,
        registry: &FactoryRegistry,
        seed: u64,
    ) -> Result<Self, StreamError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let grid = PlacementGrid::build(&layout, &mut rng)?;
        Self::new(stream, layout, grid, registry, rng)
    }

    /// Advance the world given the viewer's position on the travel axis.
    pub fn advance(&mut self, tracked: f32) -> Vec<StreamEvent> {
        let _span = tracing::debug_span!("stream_advance", phase = %self.phase).entered();
        let start = Instant::now();
        let mut events = Vec::new();
        self.stats.cells_loaded = 0;
        self.stats.rows_recycled = 0;

        match self.phase {
            StreamPhase::Retired => {}
            StreamPhase::Unloading => self.retire(&mut events),
            _ if self.stream.direction.has_passed(tracked, self.thresholds.unload_at) => {
                self.visible = false;
                self.phase = StreamPhase::Unloading;
                tracing::info!(tracked, unload_at = self.thresholds.unload_at, "world hidden");
                events.push(StreamEvent::Hidden);
            }
            StreamPhase::Loading => self.load(tracked, &mut events),
            StreamPhase::Following => self.follow(tracked, &mut events),
        }

        self.stats.live_rows = self.rows.len();
        self.stats.elapsed = start.elapsed();
        tracing::trace!(
            cells = self.stats.cells_loaded,
            recycled = self.stats.rows_recycled,
            live_rows = self.stats.live_rows,
            events = events.len(),
            "advance complete"
        );
        events
    }

    fn load(&mut self, tracked: f32, events: &mut Vec<StreamEvent>) {
        if self.halted.is_some() {
            return;
        }
        let direction = self.stream.direction;
        let spacing = self.stream.grid_spacing;
        let (total_x, total_z) = (self.grid.total_x(), self.grid.total_z());

        for _ in 0..self.stream.cells_per_advance {
            // A factory may push the load bar back mid-advance.
            if !direction.has_passed(tracked, self.thresholds.load_bar) {
                return;
            }
            if self.grid.is_empty() {
                self.complete(events);
                return;
            }
            let Some(factory) = self.factory.clone() else {
                let name = self.stream.factory.clone();
                tracing::error!(factory = %name, "loading halted: asset factory not registered");
                self.halted = Some(StreamError::MissingFactory(name.clone()));
                events.push(StreamEvent::LoadingHalted { factory: name });
                return;
            };

            let row_position = Vec3::new(0.0, 0.0, -direction.sign() * self.cursor.z_pos);
            if self.cursor.x == 0 {
                if let Some(row) = self.rows.push_row(row_position) {
                    tracing::debug!(row, z = self.cursor.z, "row opened");
                }
            }

            let cell = self.cursor.coord();
            let local_position = Vec3::new(self.cursor.x_pos, 0.0, row_position.z);
            let ctx = PlacementContext {
                cell,
                info: self.grid.cell(cell).unwrap_or_default(),
                local_position,
                origin: self.stream.origin,
                total_x,
                total_z,
                layout: &self.layout,
                direction,
            };
            let placement = factory.place(&ctx, &mut self.rng);

            if let Some(mut content) = placement.content {
                if let Some(row) = self.rows.current_mut() {
                    content.transform.position -= row.position;
                    row.contents.push(content);
                }
            }
            if placement.defer_load_bar != 0.0 {
                self.thresholds.load_bar =
                    direction.advance(self.thresholds.load_bar, placement.defer_load_bar);
            }
            self.stats.cells_loaded += 1;
            self.stats.total_cells_loaded += 1;

            let more = if placement.finish_row {
                tracing::debug!(z = cell.z, "row finished early");
                self.cursor.end_row(spacing)
            } else {
                self.cursor.step(total_x, spacing)
            };
            if !more {
                self.complete(events);
                return;
            }
        }
    }

    fn complete(&mut self, events: &mut Vec<StreamEvent>) {
        self.phase = StreamPhase::Following;
        self.visible = true;
        let rows = self.rows.len();
        let contents = self.rows.content_count();
        tracing::info!(rows, contents, "loading complete");
        events.push(StreamEvent::LoadingComplete { rows, contents });
    }

    fn follow(&mut self, tracked: f32, events: &mut Vec<StreamEvent>) {
        if self.frozen {
            return;
        }
        let direction = self.stream.direction;
        let stop = self.thresholds.stop_follow_at;
        if direction.has_passed(tracked, stop) {
            self.frozen = true;
            tracing::info!(tracked, stop_follow_at = stop, "follow stopped");
            events.push(StreamEvent::FollowStopped);
            return;
        }
        // Recycling runs strictly short of the stop threshold.
        if !direction.has_passed(stop, tracked) {
            return;
        }
        if !direction.has_passed(tracked, self.thresholds.follow_center) {
            return;
        }

        let span = self.rows.capacity() as f32 * self.stream.grid_spacing;
        let Some(moved) = self.rows.recycle_next(direction.sign() * span) else {
            return;
        };
        self.thresholds.follow_center =
            direction.advance(self.thresholds.follow_center, self.stream.grid_spacing);
        self.stats.rows_recycled += 1;
        self.stats.total_rows_recycled += 1;
        tracing::debug!(row = moved.row, from = moved.from.z, to = moved.to.z, "row recycled");
        events.push(StreamEvent::RowRepositioned {
            row: moved.row,
            from: moved.from,
            to: moved.to,
        });
    }

    fn retire(&mut self, events: &mut Vec<StreamEvent>) {
        let released_rows = self.rows.release();
        self.phase = StreamPhase::Retired;
        tracing::info!(released_rows, "world retired");
        events.push(StreamEvent::Retired { released_rows });
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The error that halted loading, if any.
    pub fn halted(&self) -> Option<&StreamError> {
        self.halted.as_ref()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn rows(&self) -> &RowBuffer {
        &self.rows
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn stream_config(&self) -> &StreamConfig {
        &self.stream
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    pub fn summary(&self) -> WorldSummary {
        WorldSummary {
            factory: self.stream.factory.clone(),
            phase: self.phase,
            visible: self.visible,
            frozen: self.frozen,
            rows: self.rows.len(),
            contents: self.rows.content_count(),
            recycle_index: self.rows.recycle_index(),
            thresholds: self.thresholds,
        }
    }
}

impl fmt::Debug for StreamingWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingWorld")
            .field("factory", &self.stream.factory)
            .field("phase", &self.phase)
            .field("rows", &self.rows.len())
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

/// Point-in-time view of a world for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSummary {
    pub factory: String,
    pub phase: StreamPhase,
    pub visible: bool,
    pub frozen: bool,
    pub rows: usize,
    pub contents: usize,
    pub recycle_index: usize,
    pub thresholds: Thresholds,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10} {:<12} rows={:<4} contents={:<5} next={:<3} load_bar={:.1} center={:.1} stop={:.1} unload={:.1}",
            self.phase,
            self.factory,
            self.rows,
            self.contents,
            self.recycle_index,
            self.thresholds.load_bar,
            self.thresholds.follow_center,
            self.thresholds.stop_follow_at,
            self.thresholds.unload_at,
        )?;
        if self.frozen {
            f.write_str(" frozen")?;
        }
        if !self.visible {
            f.write_str(" hidden")?;
        }
        Ok(())
    }
}
