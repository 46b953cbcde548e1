//! Batch construction of 3D Delaunay triangulations.
//!
//! [`DelaunayTriangulation`] is the entry point of the crate: it validates the
//! input points, resolves coincident points according to the configured
//! [`DuplicatePolicy`], picks a non-degenerate initial tetrahedron and inserts
//! the remaining points one by one in randomized order
//! (see [`incremental_insertion`](crate::core::algorithms::incremental_insertion)).
//!
//! The finished triangulation is immutable. Points are identified by their
//! index in the input slice; every query reports input indices.
//!
//! # Examples
//!
//! ```rust
//! use delaunay_alpha::prelude::*;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//!     Point::new([0.25, 0.25, 0.25]),
//! ];
//! let dt = DelaunayTriangulation::new(&points).unwrap();
//! assert_eq!(dt.number_of_vertices(), 5);
//! assert_eq!(dt.number_of_cells(), 4);
//! assert!(dt.is_valid().is_ok());
//! ```

use crate::core::algorithms::incremental_insertion::{
    InsertionError, create_initial_simplex, insert_vertex,
};
use crate::core::collections::FastHashSet;
use crate::core::facet::EdgeKey;
use crate::core::triangulation_data_structure::{CellKey, Tds, VertexKey};
use crate::core::util::{DelaunayValidationError, MergedDuplicate, find_duplicate_points, is_delaunay};
use crate::geometry::point::{Point, PointValidationError};
use crate::geometry::predicates::{Orientation, are_collinear, orientation};
use crate::geometry::util::BoundingBox;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Default seed for the insertion-order shuffle.
pub const DEFAULT_SEED: u64 = 0x5EED_DE1A_0A1F_A001;

/// Default coincidence tolerance, relative to the diagonal of the input's
/// bounding box.
///
/// Two points merge when their distance is at most `epsilon * diagonal`, so
/// the outcome does not depend on the scale of the input. Zero (or any value
/// that yields a non-positive tolerance) selects exact coordinate matching.
pub const DEFAULT_DUPLICATE_EPSILON: f64 = 1e-10;

/// What to do with input points that coincide with an earlier point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Fail with [`TriangulationConstructionError::DuplicateCoordinates`].
    Reject,
    /// Keep the first occurrence and drop the others.
    #[default]
    Merge,
}

/// Construction options.
///
/// # Examples
///
/// ```rust
/// use delaunay_alpha::core::delaunay_triangulation::{
///     DuplicatePolicy, TriangulationOptionsBuilder,
/// };
///
/// let options = TriangulationOptionsBuilder::default()
///     .seed(7)
///     .duplicate_policy(DuplicatePolicy::Reject)
///     .build()
///     .unwrap();
/// assert_eq!(options.seed, 7);
/// assert!(options.shuffle);
/// ```
#[derive(Builder, Clone, Debug)]
pub struct TriangulationOptions {
    /// Seed of the insertion-order shuffle and of the walk's random choices.
    #[builder(default = "DEFAULT_SEED")]
    pub seed: u64,
    /// Coincident-point policy.
    #[builder(default)]
    pub duplicate_policy: DuplicatePolicy,
    /// Coincidence tolerance relative to the bounding-box diagonal
    /// (see [`DEFAULT_DUPLICATE_EPSILON`]).
    #[builder(default = "DEFAULT_DUPLICATE_EPSILON")]
    pub duplicate_epsilon: f64,
    /// Insert points in shuffled order (recommended).
    #[builder(default = "true")]
    pub shuffle: bool,
    /// Checked between insertions; setting it aborts the build.
    #[builder(setter(strip_option), default)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            duplicate_policy: DuplicatePolicy::default(),
            duplicate_epsilon: DEFAULT_DUPLICATE_EPSILON,
            shuffle: true,
            cancel: None,
        }
    }
}

impl TriangulationOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Why the input spans no tetrahedron.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegeneracyKind {
    /// All points coincide.
    AllCoincident,
    /// All points lie on one line.
    Collinear,
    /// All points lie in one plane.
    Coplanar,
}

impl fmt::Display for DegeneracyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllCoincident => write!(f, "all points coincide"),
            Self::Collinear => write!(f, "all points are collinear"),
            Self::Coplanar => write!(f, "all points are coplanar"),
        }
    }
}

/// Errors that abort a triangulation build. No partial mesh is returned.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TriangulationConstructionError {
    /// Fewer than four input points.
    #[error("Insufficient vertices for 3D triangulation: found {found}, need at least {required}")]
    InsufficientVertices {
        /// Number of points supplied.
        found: usize,
        /// Minimum number of points.
        required: usize,
    },
    /// An input point has a NaN or infinite coordinate.
    #[error("Invalid input point {index}: {source}")]
    InvalidPoint {
        /// Index of the offending point.
        index: usize,
        /// The validation failure.
        #[source]
        source: PointValidationError,
    },
    /// Two input points coincide under [`DuplicatePolicy::Reject`].
    #[error("Duplicate coordinates: point {duplicate} coincides with point {first}")]
    DuplicateCoordinates {
        /// Index of the earlier point.
        first: usize,
        /// Index of the later, coincident point.
        duplicate: usize,
    },
    /// The points do not span a tetrahedron.
    #[error("Geometric degeneracy: {kind}")]
    GeometricDegeneracy {
        /// What kind of degeneracy.
        kind: DegeneracyKind,
    },
    /// The cancellation flag was raised.
    #[error("Construction cancelled after inserting {inserted} points")]
    Cancelled {
        /// Points inserted before the flag was observed.
        inserted: usize,
    },
    /// Incremental insertion failed.
    #[error("Insertion failed: {0}")]
    Insertion(#[from] InsertionError),
}

// =============================================================================
// STRUCT DEFINITION
// =============================================================================

/// A 3D Delaunay triangulation of a point set.
#[derive(Clone, Debug)]
pub struct DelaunayTriangulation {
    tds: Tds,
    points: Vec<Point>,
    vertex_keys: Vec<Option<VertexKey>>,
    merged: Vec<MergedDuplicate>,
}

impl DelaunayTriangulation {
    /// Builds the triangulation with default [`TriangulationOptions`].
    ///
    /// # Errors
    ///
    /// See [`Self::with_options`].
    pub fn new(points: &[Point]) -> Result<Self, TriangulationConstructionError> {
        Self::with_options(points, &TriangulationOptions::default())
    }

    /// Builds the triangulation.
    ///
    /// # Errors
    ///
    /// - [`TriangulationConstructionError::InsufficientVertices`] for fewer than 4 points.
    /// - [`TriangulationConstructionError::InvalidPoint`] for NaN/infinite coordinates.
    /// - [`TriangulationConstructionError::DuplicateCoordinates`] under [`DuplicatePolicy::Reject`].
    /// - [`TriangulationConstructionError::GeometricDegeneracy`] if the points span no tetrahedron.
    /// - [`TriangulationConstructionError::Cancelled`] if the cancel flag is raised.
    /// - [`TriangulationConstructionError::Insertion`] if an insertion fails.
    pub fn with_options(
        points: &[Point],
        options: &TriangulationOptions,
    ) -> Result<Self, TriangulationConstructionError> {
        if points.len() < 4 {
            return Err(TriangulationConstructionError::InsufficientVertices {
                found: points.len(),
                required: 4,
            });
        }
        for (index, p) in points.iter().enumerate() {
            p.validate()
                .map_err(|source| TriangulationConstructionError::InvalidPoint { index, source })?;
        }

        tracing::debug!(
            points = points.len(),
            seed = options.seed,
            "building Delaunay triangulation"
        );

        let tolerance = duplicate_tolerance(points, options.duplicate_epsilon);
        let merged = find_duplicate_points(points, tolerance);
        if let Some(first) = merged.first() {
            if options.duplicate_policy == DuplicatePolicy::Reject {
                return Err(TriangulationConstructionError::DuplicateCoordinates {
                    first: first.kept,
                    duplicate: first.index,
                });
            }
            tracing::debug!(count = merged.len(), "merged coincident input points");
        }
        let dropped: FastHashSet<usize> = merged.iter().map(|m| m.index).collect();

        let mut order: Vec<usize> = (0..points.len()).filter(|i| !dropped.contains(i)).collect();
        let mut rng = StdRng::seed_from_u64(options.seed);
        if options.shuffle {
            order.shuffle(&mut rng);
        }
        select_initial_simplex(points, &mut order)?;

        let mut tds = Tds::new();
        let mut vertex_keys = vec![None; points.len()];
        if options.is_cancelled() {
            return Err(TriangulationConstructionError::Cancelled { inserted: 0 });
        }

        let mut initial = [VertexKey::default(); 4];
        for (slot, &index) in initial.iter_mut().zip(&order) {
            let vkey = tds.insert_vertex(points[index], index);
            *slot = vkey;
            vertex_keys[index] = Some(vkey);
        }
        let mut hint: Option<CellKey> = Some(create_initial_simplex(&mut tds, initial)?);

        for (inserted, &index) in order.iter().enumerate().skip(4) {
            if options.is_cancelled() {
                tracing::debug!(inserted, "triangulation build cancelled");
                return Err(TriangulationConstructionError::Cancelled { inserted });
            }
            let vkey = tds.insert_vertex(points[index], index);
            hint = Some(insert_vertex(&mut tds, vkey, hint, &mut rng)?);
            vertex_keys[index] = Some(vkey);
            tracing::trace!(inserted = inserted + 1, "vertex inserted");
        }

        let dt = Self {
            tds,
            points: points.to_vec(),
            vertex_keys,
            merged,
        };
        tracing::debug!(
            vertices = dt.number_of_vertices(),
            cells = dt.number_of_cells(),
            "Delaunay triangulation built"
        );
        Ok(dt)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The underlying triangulation data structure.
    #[must_use]
    pub const fn tds(&self) -> &Tds {
        &self.tds
    }

    /// The input points, including merged duplicates.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of vertices in the triangulation (input points minus merged duplicates).
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.tds.number_of_vertices()
    }

    /// Number of finite tetrahedra.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.tds.number_of_finite_cells()
    }

    /// Input points dropped as coincident with an earlier point.
    #[must_use]
    pub fn merged_duplicates(&self) -> &[MergedDuplicate] {
        &self.merged
    }

    /// Vertex key of input point `index`, or `None` if it was merged away.
    #[must_use]
    pub fn vertex_key(&self, index: usize) -> Option<VertexKey> {
        self.vertex_keys.get(index).copied().flatten()
    }

    /// Input index of a finite vertex.
    #[must_use]
    pub fn vertex_index(&self, vkey: VertexKey) -> Option<usize> {
        self.tds.input_index(vkey)
    }

    fn indices<const N: usize>(&self, keys: [VertexKey; N]) -> Option<[usize; N]> {
        let mut out = [0; N];
        for (slot, vkey) in out.iter_mut().zip(keys) {
            *slot = self.tds.input_index(vkey)?;
        }
        Some(out)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Input indices of every finite tetrahedron, positively oriented.
    #[must_use]
    pub fn tetrahedra(&self) -> Vec<[usize; 4]> {
        self.tds
            .finite_cells()
            .filter_map(|(_, cell)| self.indices(*cell.vertices()))
            .collect()
    }

    /// Every Delaunay edge once, as input indices with the smaller first.
    #[must_use]
    pub fn finite_edges(&self) -> Vec<[usize; 2]> {
        self.tds
            .finite_edges()
            .into_iter()
            .filter_map(|e: EdgeKey| {
                let (a, b) = e.endpoints();
                let [i, j] = self.indices([a, b])?;
                Some([i.min(j), i.max(j)])
            })
            .collect()
    }

    /// The Delaunay wireframe as point pairs, optionally dropping edges longer than `max_length`.
    #[must_use]
    pub fn edge_segments(&self, max_length: Option<f64>) -> Vec<[Point; 2]> {
        self.finite_edges()
            .into_iter()
            .map(|[i, j]| [self.points[i], self.points[j]])
            .filter(|[a, b]| max_length.is_none_or(|limit| a.distance(b) <= limit))
            .collect()
    }

    /// Triangles of the convex hull, counter-clockwise seen from outside.
    #[must_use]
    pub fn convex_hull_facets(&self) -> Vec<[usize; 3]> {
        self.tds
            .hull_facets()
            .into_iter()
            .filter_map(|f| self.indices(self.tds.facet_vertices(f)?))
            .collect()
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Brute-force check of the empty-circumsphere property.
    ///
    /// # Errors
    ///
    /// Returns the first [`DelaunayValidationError`] found.
    pub fn validate_delaunay(&self) -> Result<(), DelaunayValidationError> {
        is_delaunay(&self.tds)
    }

    /// Structural and Delaunay validation.
    ///
    /// # Errors
    ///
    /// Returns the first structural or geometric violation.
    pub fn is_valid(&self) -> Result<(), DelaunayValidationError> {
        self.tds.is_valid()?;
        self.validate_delaunay()
    }
}

/// Absolute coincidence distance for `points` given a tolerance relative to
/// their bounding-box diagonal.
///
/// Returns zero (exact matching) for a non-positive or non-finite product.
fn duplicate_tolerance(points: &[Point], relative: f64) -> f64 {
    let diagonal = BoundingBox::from_points(points).map_or(0.0, |bbox| bbox.diagonal());
    let tolerance = relative * diagonal;
    if tolerance > 0.0 && tolerance.is_finite() {
        tolerance
    } else {
        0.0
    }
}

/// Moves four affinely independent points to the front of `order`.
///
/// The remaining points keep their relative order.
fn select_initial_simplex(
    points: &[Point],
    order: &mut Vec<usize>,
) -> Result<(), TriangulationConstructionError> {
    let degenerate = |kind| TriangulationConstructionError::GeometricDegeneracy { kind };
    let p = |pos: usize| &points[order[pos]];

    let Some(&first) = order.first() else {
        return Err(degenerate(DegeneracyKind::AllCoincident));
    };
    let p0 = &points[first];
    let i1 = (0..order.len())
        .find(|&k| p(k) != p0)
        .ok_or_else(|| degenerate(DegeneracyKind::AllCoincident))?;
    let i2 = (0..order.len())
        .find(|&k| !are_collinear(p0, p(i1), p(k)))
        .ok_or_else(|| degenerate(DegeneracyKind::Collinear))?;
    let i3 = (0..order.len())
        .find(|&k| orientation(p0, p(i1), p(i2), p(k)) != Orientation::DEGENERATE)
        .ok_or_else(|| degenerate(DegeneracyKind::Coplanar))?;

    let chosen = [0, i1, i2, i3];
    let mut reordered: Vec<usize> = chosen.iter().map(|&k| order[k]).collect();
    reordered.extend(
        order
            .iter()
            .enumerate()
            .filter(|(k, _)| !chosen.contains(k))
            .map(|(_, &index)| index),
    );
    *order = reordered;
    Ok(())
}
