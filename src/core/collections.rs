//! Collection types used throughout the triangulation.
//!
//! The triangulation is an arena: vertices and cells live in slot maps and
//! refer to each other by key. This module fixes the concrete storage and the
//! fast (non-cryptographic) hash containers used for temporary bookkeeping.
//!
//! - [`aliases`]: storage backend, hash maps/sets, small inline buffers
//! - [`buffers`]: algorithm-specific buffer sizes
//! - [`secondary_maps`]: per-key auxiliary data during algorithms

mod aliases;
mod buffers;
mod secondary_maps;

pub use aliases::*;
pub use buffers::*;
pub use secondary_maps::*;
