//! Layout: weighted sampling and the footprint packing pass.
//!
//! # Invariants
//! - A grid is built once, synchronously, and never mutated afterwards.
//! - Tables span exactly `total_z x total_x`; nothing is written outside.
//! - Once a cell holds a footprint it is never overwritten: wider
//!   footprints are packed first and claim clearance over their neighbours.
//! - Malformed weight tables fail the build; there are no partial grids.

mod placement;
mod sampler;

pub use placement::{
    BlockBounds, CellInfo, Clearance, Footprint, LayoutConfig, PlacementGrid, Table,
};
pub use sampler::{WeightSpec, parse_weights, sample};

pub fn crate_info() -> &'static str {
    "skyline-layout v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("layout"));
    }
}
