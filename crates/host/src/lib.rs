//! Host-platform boundary: the capability surface GridKit consumes.
//!
//! The host platform owns worlds, cells, and entities; GridKit never
//! reimplements them. This crate pins down the minimal contract the rest of
//! the workspace programs against, plus a deterministic in-memory host
//! ([`mem`]) for tests and demos.
//!
//! # Invariants
//! - `World::cell_at` is the only operation allowed to block; everything else
//!   is a cheap accessor.
//! - Host failures propagate unchanged; there are no retries at this layer.

mod platform;

pub mod mem;

pub use platform::{Cell, Entity, HostError, Locate, World};

pub fn crate_info() -> &'static str {
    "gridkit-host v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("host"));
    }
}
