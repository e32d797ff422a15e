use rand::Rng;
use serde::{Deserialize, Serialize};
use skyline_common::{ConfigError, GridCoord};

use crate::sampler::WeightSpec;

/// Layout parameters for one world region: repeated blocks, the gaps
/// (roads) between them, and the size classes placed inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Cells per block along X.
    pub block_x: usize,
    /// Cells per block along Z.
    pub block_z: usize,
    pub num_block_x: usize,
    pub num_block_z: usize,
    /// Empty cells between neighbouring blocks, on both axes.
    pub gap_width: usize,
    /// Largest footprint width class.
    pub max_width: u32,
    /// `width_probs[w - 1]` is the chance a width-`w` footprint is attempted
    /// at an eligible cell.
    pub width_probs: Vec<f64>,
    /// Largest height class; heights are drawn from `1..=max_height`.
    pub max_height: u32,
    pub height_weights: Vec<u32>,
    /// When false only the grid dimensions are computed.
    pub build_grids: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            block_x: 5,
            block_z: 15,
            num_block_x: 1,
            num_block_z: 1,
            gap_width: 0,
            max_width: 5,
            width_probs: vec![0.2; 5],
            max_height: 5,
            height_weights: vec![1; 5],
            build_grids: true,
        }
    }
}

impl LayoutConfig {
    /// Check probability and weight tables against the size classes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width_probs.len() != self.max_width as usize {
            return Err(ConfigError::LengthMismatch {
                what: "width probabilities",
                options: self.max_width as usize,
                weights: self.width_probs.len(),
            });
        }
        for (index, &value) in self.width_probs.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability {
                    what: "width probabilities",
                    index,
                    value,
                });
            }
        }
        self.height_spec().map(|_| ())
    }

    /// Height options `1..=max_height` weighted by `height_weights`.
    pub fn height_spec(&self) -> Result<WeightSpec<u32>, ConfigError> {
        WeightSpec::labelled(
            "height weights",
            (1..=self.max_height).collect(),
            self.height_weights.clone(),
        )
    }

    /// Full grid size `(total_x, total_z)`. Zero in either axis empties both.
    pub fn totals(&self) -> (usize, usize) {
        let total_x = axis_total(self.block_x, self.num_block_x, self.gap_width);
        let total_z = axis_total(self.block_z, self.num_block_z, self.gap_width);
        if total_x == 0 || total_z == 0 {
            (0, 0)
        } else {
            (total_x, total_z)
        }
    }

    /// Bounds of every block, Z blocks outermost.
    pub fn blocks(&self) -> Vec<BlockBounds> {
        if self.totals() == (0, 0) {
            return Vec::new();
        }
        let step_x = self.block_x + self.gap_width;
        let step_z = self.block_z + self.gap_width;
        let mut blocks = Vec::with_capacity(self.num_block_x * self.num_block_z);
        for bz in 0..self.num_block_z {
            for bx in 0..self.num_block_x {
                blocks.push(BlockBounds {
                    x_start: bx * step_x,
                    x_end: bx * step_x + self.block_x,
                    z_start: bz * step_z,
                    z_end: bz * step_z + self.block_z,
                });
            }
        }
        blocks
    }
}

fn axis_total(block: usize, count: usize, gap: usize) -> usize {
    if block == 0 || count == 0 {
        0
    } else {
        block + (block + gap) * (count - 1)
    }
}

/// Half-open cell bounds of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockBounds {
    pub x_start: usize,
    pub x_end: usize,
    pub z_start: usize,
    pub z_end: usize,
}

impl BlockBounds {
    pub fn contains(&self, coord: GridCoord) -> bool {
        (self.x_start..self.x_end).contains(&coord.x) && (self.z_start..self.z_end).contains(&coord.z)
    }
}

/// Width and height class assigned to a cell. Width 0 means empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Footprint {
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub const EMPTY: Self = Self {
        width: 0,
        height: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Largest half-extent claimed through a cell on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Clearance {
    pub x: f32,
    pub z: f32,
}

impl Clearance {
    /// Whether a footprint with half-extent `dist` may be centred here.
    ///
    /// Rejects an exact match on either axis, and requires room on at least
    /// one axis.
    pub fn admits(&self, dist: f32) -> bool {
        dist != self.x && dist != self.z && (dist > self.x || dist > self.z)
    }
}

/// Everything the packing pass recorded for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellInfo {
    pub footprint: Footprint,
    pub clearance: Clearance,
    pub heightmap: u32,
}

/// Which table [`PlacementGrid::format_table`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Width,
    Height,
    Heightmap,
}

#[derive(Debug, Clone)]
struct GridTables {
    width: Vec<u32>,
    height: Vec<u32>,
    clearance: Vec<Clearance>,
    heightmap: Vec<u32>,
}

/// Footprint tables for a whole world region, computed once.
///
/// Tables are row-major: index `z * total_x + x`. They are written only by
/// [`PlacementGrid::build`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PlacementGrid {
    total_x: usize,
    total_z: usize,
    blocks: Vec<BlockBounds>,
    tables: Option<GridTables>,
}

impl PlacementGrid {
    /// Run the descending-width greedy packing over every block.
    pub fn build<R: Rng + ?Sized>(config: &LayoutConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let (total_x, total_z) = config.totals();
        let _span = tracing::info_span!("placement_build", total_x, total_z).entered();

        let mut grid = Self::dimensions_only(config);
        if !config.build_grids {
            tracing::debug!("grid tables disabled, dimensions only");
            return Ok(grid);
        }

        let heights = config.height_spec()?;
        let cells = total_x * total_z;
        let mut tables = GridTables {
            width: vec![0; cells],
            height: vec![0; cells],
            clearance: vec![Clearance::default(); cells],
            heightmap: vec![0; cells],
        };
        for block in &grid.blocks {
            tables.pack_block(block, total_x, config, &heights, rng);
        }
        grid.tables = Some(tables);

        tracing::info!(
            total_x,
            total_z,
            placed = grid.placed_count(),
            "placement grid built"
        );
        Ok(grid)
    }

    /// Grid with dimensions and block bounds but no footprint tables.
    pub fn dimensions_only(config: &LayoutConfig) -> Self {
        let (total_x, total_z) = config.totals();
        Self {
            total_x,
            total_z,
            blocks: config.blocks(),
            tables: None,
        }
    }

    pub fn total_x(&self) -> usize {
        self.total_x
    }

    pub fn total_z(&self) -> usize {
        self.total_z
    }

    pub fn is_empty(&self) -> bool {
        self.total_x == 0 || self.total_z == 0
    }

    pub fn has_tables(&self) -> bool {
        self.tables.is_some()
    }

    pub fn blocks(&self) -> &[BlockBounds] {
        &self.blocks
    }

    /// Full cell record, or `None` outside the grid. Without tables every
    /// in-range cell reads as empty.
    pub fn cell(&self, coord: GridCoord) -> Option<CellInfo> {
        if coord.x >= self.total_x || coord.z >= self.total_z {
            return None;
        }
        let Some(t) = &self.tables else {
            return Some(CellInfo {
                footprint: Footprint::EMPTY,
                clearance: Clearance::default(),
                heightmap: 0,
            });
        };
        let i = coord.z * self.total_x + coord.x;
        Some(CellInfo {
            footprint: Footprint {
                width: t.width[i],
                height: t.height[i],
            },
            clearance: t.clearance[i],
            heightmap: t.heightmap[i],
        })
    }

    pub fn footprint(&self, coord: GridCoord) -> Footprint {
        self.cell(coord).map(|c| c.footprint).unwrap_or_default()
    }

    /// Number of cells holding a footprint.
    pub fn placed_count(&self) -> usize {
        self.tables
            .as_ref()
            .map_or(0, |t| t.width.iter().filter(|&&w| w != 0).count())
    }

    /// FNV-1a digest of dimensions and tables, stable across platforms.
    pub fn fingerprint(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &(self.total_x as u64).to_le_bytes());
        mix(&mut h, &(self.total_z as u64).to_le_bytes());
        if let Some(t) = &self.tables {
            for i in 0..t.width.len() {
                mix(&mut h, &t.width[i].to_le_bytes());
                mix(&mut h, &t.height[i].to_le_bytes());
                mix(&mut h, &t.heightmap[i].to_le_bytes());
            }
        }
        h
    }

    /// Render one table, a bracketed line per Z row.
    pub fn format_table(&self, table: Table) -> String {
        let mut out = String::new();
        let Some(t) = &self.tables else {
            return out;
        };
        let values = match table {
            Table::Width => &t.width,
            Table::Height => &t.height,
            Table::Heightmap => &t.heightmap,
        };
        for row in values.chunks(self.total_x.max(1)) {
            out.push_str("[ ");
            for v in row {
                out.push_str(&format!("{v} "));
            }
            out.push_str("]\n");
        }
        out
    }
}

impl GridTables {
    fn pack_block<R: Rng + ?Sized>(
        &mut self,
        block: &BlockBounds,
        total_x: usize,
        config: &LayoutConfig,
        heights: &WeightSpec<u32>,
        rng: &mut R,
    ) {
        for w in (1..=config.max_width).rev() {
            let buffer = (w / 2) as usize;
            let dist = w as f32 / 2.0;
            let p = config.width_probs[(w - 1) as usize];
            let zs = (block.z_start + buffer)..block.z_end.saturating_sub(buffer);
            let xs = (block.x_start + buffer)..block.x_end.saturating_sub(buffer);

            for z in zs {
                for x in xs.clone() {
                    let i = z * total_x + x;
                    if !self.clearance[i].admits(dist) {
                        continue;
                    }
                    if rng.random::<f64>() >= p {
                        continue;
                    }
                    debug_assert_eq!(self.width[i], 0, "footprint at ({x}, {z}) overwritten");
                    let height = *heights.sample(rng);
                    self.width[i] = w;
                    self.height[i] = height;
                    self.claim(block, total_x, GridCoord::new(x, z), w, height);
                }
            }
        }
    }

    /// Record clearance over the footprint plus buffer, and the obstruction
    /// volume over the footprint itself. Clipped to the block.
    fn claim(&mut self, block: &BlockBounds, total_x: usize, at: GridCoord, w: u32, height: u32) {
        let reach = (w - 1) as usize;
        let rad = (w / 2) as usize;
        let dist = w as f32 / 2.0;
        let z_lo = at.z.saturating_sub(reach).max(block.z_start);
        let z_hi = (at.z + reach).min(block.z_end - 1);
        let x_lo = at.x.saturating_sub(reach).max(block.x_start);
        let x_hi = (at.x + reach).min(block.x_end - 1);

        for zi in z_lo..=z_hi {
            for xi in x_lo..=x_hi {
                let i = zi * total_x + xi;
                let dx = at.x.abs_diff(xi);
                let dz = at.z.abs_diff(zi);
                let c = &mut self.clearance[i];
                c.x = c.x.max(dist - dx as f32);
                c.z = c.z.max(dist - dz as f32);
                if dx <= rad && dz <= rad {
                    self.heightmap[i] = self.heightmap[i].max(height * w);
                }
            }
        }
    }
}
