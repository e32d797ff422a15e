//! Streaming: incremental loading, row recycling and retirement of a block
//! world in front of a moving viewer.
//!
//! # Invariants
//! - `advance` does bounded work: at most `cells_per_advance` factory calls,
//!   one row recycle, or one lifecycle transition.
//! - Phases only move forward: loading, following, unloading, retired.
//! - Loading always completes before any row is recycled.
//! - Rows are created once while loading; following moves them, never
//!   recreates them, round-robin over the row buffer.
//! - A missing asset factory halts loading for that world and is reported
//!   exactly once.

mod config;
mod rows;
mod world;

pub use config::{StreamConfig, Thresholds};
pub use rows::{Recycled, Row, RowBuffer};
pub use world::{StreamError, StreamEvent, StreamPhase, StreamStats, StreamingWorld, WorldSummary};

pub fn crate_info() -> &'static str {
    "skyline-stream v0.1.0"
}
