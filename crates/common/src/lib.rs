//! Shared types for the skyline crates: grid coordinates, transforms, the
//! travel axis, and the configuration error every crate reports through.

mod error;
mod types;

pub use error::ConfigError;
pub use types::{GridCoord, Transform, TravelDirection};

pub fn crate_info() -> &'static str {
    "skyline-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
