//! Alpha-shape extraction.
//!
//! An [`AlphaShape`] is the boundary of the alpha complex at one α: a pure
//! filter over the precomputed [`AlphaComplex`] tables, linear in the number
//! of simplices and free of geometric computation. Queries at different α are
//! independent and repeated queries at the same α return identical output.
//!
//! Two extraction modes exist:
//!
//! - [`AlphaShapeMode::Regular`] reports the REGULAR triangles (the surface of
//!   the solid part of the complex) and their edges.
//! - [`AlphaShapeMode::General`] additionally reports SINGULAR triangles,
//!   every SINGULAR or REGULAR edge, and SINGULAR (isolated) points.

use crate::alpha::complex::AlphaComplex;
use crate::alpha::interval::SimplexClassification;
use crate::core::collections::FastHashSet;
use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which simplices an extraction reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlphaShapeMode {
    /// REGULAR triangles only.
    #[default]
    Regular,
    /// REGULAR and SINGULAR triangles, edges and points.
    General,
}

/// Errors raised at the α query boundary.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AlphaQueryError {
    /// α is negative or NaN.
    #[error("Invalid alpha {alpha}: must be a non-negative number")]
    InvalidAlpha {
        /// The rejected value.
        alpha: f64,
    },
}

/// Validates a query α. `+∞` is accepted.
///
/// # Errors
///
/// Returns [`AlphaQueryError::InvalidAlpha`] for a negative or NaN `alpha`.
pub fn validate_alpha(alpha: f64) -> Result<(), AlphaQueryError> {
    if alpha.is_nan() || alpha < 0.0 {
        return Err(AlphaQueryError::InvalidAlpha { alpha });
    }
    Ok(())
}

/// A boundary triangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryTriangle {
    /// Input indices, counter-clockwise seen from outside the solid.
    pub indices: [usize; 3],
    /// The corresponding positions.
    pub points: [Point; 3],
    /// REGULAR, or SINGULAR in general mode.
    pub classification: SimplexClassification,
}

/// A boundary edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryEdge {
    /// Input indices, smaller first.
    pub indices: [usize; 2],
    /// The corresponding positions.
    pub points: [Point; 2],
    /// REGULAR or SINGULAR.
    pub classification: SimplexClassification,
}

/// An isolated point of the shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    /// Input index.
    pub index: usize,
    /// Its position.
    pub point: Point,
}

/// The alpha shape at one α.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlphaShape {
    alpha: f64,
    mode: AlphaShapeMode,
    triangles: Vec<BoundaryTriangle>,
    edges: Vec<BoundaryEdge>,
    points: Vec<BoundaryPoint>,
}

impl AlphaShape {
    /// Extracts the shape at `alpha` from `complex`.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaQueryError::InvalidAlpha`] for a negative or NaN `alpha`.
    pub fn from_complex(
        complex: &AlphaComplex,
        alpha: f64,
        mode: AlphaShapeMode,
    ) -> Result<Self, AlphaQueryError> {
        validate_alpha(alpha)?;
        let pts = complex.points();
        let cells = complex.cells();

        let mut triangles = Vec::new();
        for facet in complex.facets() {
            let classification = facet.interval.classify(alpha);
            let wanted = match classification {
                SimplexClassification::REGULAR => true,
                SimplexClassification::SINGULAR => mode == AlphaShapeMode::General,
                SimplexClassification::EXTERIOR | SimplexClassification::INTERIOR => false,
            };
            if !wanted {
                continue;
            }
            // Stored outward from cells[0]; flip when the solid is on the other side.
            let first_is_solid = facet.cells[0]
                .and_then(|c| cells.get(c))
                .is_some_and(|c| c.interval.classify(alpha) == SimplexClassification::INTERIOR);
            let [a, b, c] = facet.vertices;
            let indices = if classification == SimplexClassification::REGULAR && !first_is_solid {
                [a, c, b]
            } else {
                [a, b, c]
            };
            triangles.push(BoundaryTriangle {
                indices,
                points: indices.map(|i| pts[i]),
                classification,
            });
        }

        let edges: Vec<BoundaryEdge> = match mode {
            AlphaShapeMode::Regular => {
                let mut on_surface: FastHashSet<[usize; 2]> = FastHashSet::default();
                for t in &triangles {
                    let [a, b, c] = t.indices;
                    for (u, v) in [(a, b), (b, c), (c, a)] {
                        on_surface.insert([u.min(v), u.max(v)]);
                    }
                }
                complex
                    .edges()
                    .iter()
                    .filter(|e| on_surface.contains(&e.vertices))
                    .map(|e| BoundaryEdge {
                        indices: e.vertices,
                        points: e.vertices.map(|i| pts[i]),
                        classification: e.interval.classify(alpha),
                    })
                    .collect()
            }
            AlphaShapeMode::General => complex
                .edges()
                .iter()
                .filter_map(|e| {
                    let classification = e.interval.classify(alpha);
                    matches!(
                        classification,
                        SimplexClassification::SINGULAR | SimplexClassification::REGULAR
                    )
                    .then(|| BoundaryEdge {
                        indices: e.vertices,
                        points: e.vertices.map(|i| pts[i]),
                        classification,
                    })
                })
                .collect(),
        };

        let points: Vec<BoundaryPoint> = match mode {
            AlphaShapeMode::Regular => Vec::new(),
            AlphaShapeMode::General => complex
                .vertices()
                .iter()
                .filter(|v| v.interval.classify(alpha) == SimplexClassification::SINGULAR)
                .map(|v| BoundaryPoint {
                    index: v.index,
                    point: pts[v.index],
                })
                .collect(),
        };

        tracing::trace!(
            alpha,
            ?mode,
            triangles = triangles.len(),
            edges = edges.len(),
            points = points.len(),
            "alpha shape extracted"
        );

        Ok(Self {
            alpha,
            mode,
            triangles,
            edges,
            points,
        })
    }

    /// The α this shape was extracted at.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The extraction mode.
    #[must_use]
    pub const fn mode(&self) -> AlphaShapeMode {
        self.mode
    }

    /// Boundary triangles, in a stable order.
    #[must_use]
    pub fn triangles(&self) -> &[BoundaryTriangle] {
        &self.triangles
    }

    /// Boundary edges.
    #[must_use]
    pub fn edges(&self) -> &[BoundaryEdge] {
        &self.edges
    }

    /// Isolated points (general mode only).
    #[must_use]
    pub fn points(&self) -> &[BoundaryPoint] {
        &self.points
    }

    /// Number of boundary triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of boundary edges.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of isolated points.
    #[must_use]
    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if nothing was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.edges.is_empty() && self.points.is_empty()
    }

    /// The triangle outlines as a flat segment list: three segments per triangle.
    #[must_use]
    pub fn line_segments(&self) -> Vec<[Point; 2]> {
        self.triangles
            .iter()
            .flat_map(|t| {
                let [a, b, c] = t.points;
                [[a, b], [b, c], [c, a]]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delaunay_triangulation::DelaunayTriangulation;

    fn complex() -> AlphaComplex {
        let points = vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ];
        AlphaComplex::new(&DelaunayTriangulation::new(&points).unwrap())
    }

    #[test]
    fn invalid_alpha_is_rejected() {
        let complex = complex();
        for alpha in [-1.0, -f64::MIN_POSITIVE, f64::NAN] {
            assert!(complex.shape(alpha, AlphaShapeMode::Regular).is_err());
        }
        assert!(complex.shape(f64::INFINITY, AlphaShapeMode::Regular).is_ok());
    }

    #[test]
    fn zero_alpha_yields_isolated_points_only() {
        let complex = complex();
        let regular = complex.shape(0.0, AlphaShapeMode::Regular).unwrap();
        assert!(regular.is_empty());
        let general = complex.shape(0.0, AlphaShapeMode::General).unwrap();
        assert_eq!(general.number_of_triangles(), 0);
        assert_eq!(general.number_of_edges(), 0);
        assert_eq!(general.number_of_points(), 4);
    }

    #[test]
    fn infinite_alpha_yields_the_hull() {
        let complex = complex();
        let shape = complex.shape(f64::INFINITY, AlphaShapeMode::Regular).unwrap();
        assert_eq!(shape.number_of_triangles(), 4);
        assert_eq!(shape.number_of_edges(), 6);
        assert_eq!(shape.line_segments().len(), 12);
        assert!(
            shape
                .triangles()
                .iter()
                .all(|t| t.classification == SimplexClassification::REGULAR)
        );
    }

    #[test]
    fn shapes_serialize_to_json() {
        let complex = complex();
        let shape = complex.shape(2.0, AlphaShapeMode::General).unwrap();
        let json = serde_json::to_string(&shape).unwrap();
        let back: AlphaShape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }
}
