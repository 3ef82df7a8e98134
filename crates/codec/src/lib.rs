//! Bit-set codec: packs a finite set of named options into a `u64` and back.
//!
//! Intended for storage contexts where persisting a whole collection is
//! wasteful: a set of up to 64 distinct options round-trips through a single
//! integer code.
//!
//! # Invariants
//! - `decode(encode(S))` yields exactly `S` for every representable set.
//! - Encoding is insensitive to input order (bitwise OR is commutative).
//! - Decoding ignores bits with no corresponding option, so codes written by
//!   a newer option set stay readable.

mod options;

pub use options::{BitOption, CodecError, decode, encode};

pub fn crate_info() -> &'static str {
    "gridkit-codec v0.1.0"
}
