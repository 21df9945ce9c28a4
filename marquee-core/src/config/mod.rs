//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware fills them from an
//! embedded TOML file; everything has a default matching the reference
//! build (four 32x8 panels, 80 ms scroll, 1 s connect checks).

pub mod types;

pub use types::*;
