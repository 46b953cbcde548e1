//! General helper utilities for the triangulation core.
//!
//! - [`deduplication`]: deterministic detection of coincident input points
//! - [`delaunay_validation`]: brute-force empty-circumsphere checks

pub mod deduplication;
pub mod delaunay_validation;

pub use deduplication::*;
pub use delaunay_validation::*;
