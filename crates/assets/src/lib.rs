//! Asset factories: named generators that turn a cell footprint into placed
//! content while a world loads.
//!
//! The visual assets themselves (shaders, window patterns, animation) live
//! outside this workspace; a factory only describes what goes where.
//!
//! # Invariants
//! - Factories are looked up by name once per world, never per cell.
//! - A factory sees one cell at a time and may return nothing.

mod factory;
mod generators;
mod registry;

pub use factory::{
    ArcAxis, AssetFactory, AssetKind, BuildingStyle, PlacedContent, Placement, PlacementContext,
};
pub use generators::{ColorCity, Empty, FootprintBlocks, MovingCity};
pub use registry::FactoryRegistry;

pub fn crate_info() -> &'static str {
    "skyline-assets v0.1.0"
}
