//! Geometric utility functions.
//!
//! - [`circumsphere`]: circumcenters and circumradii of tetrahedra, triangles and segments
//! - [`normalization`]: bounding boxes and unit-cube normalization
//! - [`point_generation`]: reproducible point sets for tests and benchmarks

pub mod circumsphere;
pub mod normalization;
pub mod point_generation;

pub use circumsphere::*;
pub use normalization::*;
pub use point_generation::*;
