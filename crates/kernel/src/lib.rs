//! Scene kernel: owns the streamed worlds, the frame tick and the event log,
//! and loads scene descriptions from disk.
//!
//! # Invariants
//! - Worlds advance in spawn order; the same seed and viewer path replay
//!   the same event log.
//! - Each world's RNG is seeded once from the scene seed and its id.
//! - Retired worlds leave the scene at the end of the tick that retired them.

mod config;
mod scene;

pub use config::{SceneConfig, SceneError, WorldConfig};
pub use scene::{Scene, SceneEvent, WorldId, WorldReport};

pub fn crate_info() -> &'static str {
    "skyline-kernel v0.1.0"
}
