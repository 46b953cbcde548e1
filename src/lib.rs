//! # delaunay-alpha
//!
//! Three-dimensional Delaunay triangulation with an alpha complex on top of it:
//! every simplex of the triangulation is annotated once with the α range in which
//! it is exterior, singular, regular or interior, so that the alpha shape at any α
//! is a linear filter over precomputed tables.
//!
//! # Features
//!
//! - Incremental Bowyer-Watson insertion over a slotmap arena with an infinite
//!   vertex closing the convex hull
//! - Exact orientation and in-sphere predicates (Shewchuk adaptive precision)
//! - Deterministic duplicate handling and reproducible shuffled insertion order
//! - Alpha complex intervals for tetrahedra, triangles, edges and vertices
//! - Alpha shapes in regular or general mode, alpha spectrum and solid components
//! - Voronoi dual, convex hull and wireframe extraction
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use delaunay_alpha::prelude::*;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//!     Point::new([0.2, 0.2, 0.2]),
//! ];
//!
//! let dt = DelaunayTriangulation::new(&points).unwrap();
//! assert_eq!(dt.number_of_vertices(), 5);
//! assert_eq!(dt.number_of_cells(), 4);
//! assert!(dt.is_valid().is_ok());
//!
//! let complex = AlphaComplex::new(&dt);
//!
//! // α = ∞ gives the convex hull, α = 0 gives nothing.
//! let hull = complex.shape(f64::INFINITY, AlphaShapeMode::Regular).unwrap();
//! assert_eq!(hull.number_of_triangles(), 4);
//! let empty = complex.shape(0.0, AlphaShapeMode::Regular).unwrap();
//! assert!(empty.is_empty());
//! ```
//!
//! # Configuration
//!
//! ```rust
//! use delaunay_alpha::prelude::*;
//!
//! let options = TriangulationOptionsBuilder::default()
//!     .seed(7)
//!     .duplicate_policy(DuplicatePolicy::Reject)
//!     .build()
//!     .unwrap();
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//! ];
//! let err = DelaunayTriangulation::with_options(&points, &options).unwrap_err();
//! assert!(matches!(
//!     err,
//!     TriangulationConstructionError::DuplicateCoordinates { first: 1, duplicate: 4 }
//! ));
//! ```
//!
//! # Triangulation Invariants
//!
//! [`DelaunayTriangulation::is_valid`](core::delaunay_triangulation::DelaunayTriangulation::is_valid)
//! checks:
//!
//! - **Neighbor consistency**: neighbor relationships are mutual and reference a shared facet.
//! - **Facet sharing**: every facet is shared by exactly two cells (the infinite vertex closes the hull).
//! - **Euler characteristic**: V − E + F − C = 0 over the closed complex including the infinite vertex.
//! - **Orientation**: every finite tetrahedron is positively oriented.
//! - **Delaunay property**: no vertex lies strictly inside the circumsphere of a finite tetrahedron.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the triangulation data structure and the
/// incremental Delaunay construction built on it.
pub mod core {
    /// Point location and incremental insertion
    pub mod algorithms {
        /// Cavity fill and neighbor wiring
        pub mod incremental_insertion;
        /// Visibility walk and conflict regions
        pub mod locate;
    }
    pub mod cell;
    /// Hash maps, small buffers and slotmap aliases used across the crate
    pub mod collections;
    pub mod delaunay_triangulation;
    pub mod facet;
    pub mod triangulation_data_structure;
    pub mod util;
    pub mod vertex;
    // Re-export the `core` modules.
    pub use cell::*;
    pub use delaunay_triangulation::*;
    pub use facet::*;
    pub use triangulation_data_structure::*;
    pub use util::*;
    pub use vertex::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Contains the `Point` type, exact predicates and circumsphere utilities.
pub mod geometry {
    /// Geometric constructions derived from a triangulation
    pub mod algorithms {
        /// Voronoi dual of a Delaunay triangulation
        pub mod voronoi;
        pub use voronoi::*;
    }
    pub mod point;
    pub mod predicates;
    /// Circumspheres, normalization and point generation
    pub mod util;
    pub use algorithms::*;
    pub use point::*;
    pub use predicates::*;
    pub use util::*;
}

/// Topological sanity checks.
pub mod topology {
    /// Topological invariants
    pub mod characteristics {
        pub mod euler;
    }
}

/// Alpha complex intervals and alpha-shape extraction.
pub mod alpha {
    pub mod complex;
    pub mod components;
    pub mod interval;
    pub mod shape;
    pub use complex::*;
    pub use interval::*;
    pub use shape::*;
}

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        algorithms::{incremental_insertion::InsertionError, locate::LocateError},
        cell::*,
        delaunay_triangulation::*,
        facet::*,
        triangulation_data_structure::*,
        util::*,
        vertex::*,
    };

    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
        fast_hash_set_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{algorithms::*, point::*, predicates::*, util::*};

    // Re-export from alpha
    pub use crate::alpha::{complex::*, interval::*, shape::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
