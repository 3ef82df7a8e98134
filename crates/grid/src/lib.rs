//! Lazily-resolved handles to grid cells.
//!
//! A [`CellHandle`] names a cell by (world, x, z) without touching the host.
//! Resolving the actual cell is an expensive host operation, so it happens at
//! most once, on first demand, and the result is cached for the life of the
//! handle.
//!
//! # Invariants
//! - Handle identity is (world, x, z); the cache never affects equality.
//! - A populated cache slot is never replaced or cleared.
//! - Equality checks and adjacency lookup never trigger resolution.

mod handle;

pub use handle::{CellEntity, CellHandle, CellPlayer};

pub fn crate_info() -> &'static str {
    "gridkit-grid v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("grid"));
    }
}
