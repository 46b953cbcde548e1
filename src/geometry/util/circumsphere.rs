//! Circumsphere calculations for simplices.
//!
//! This module provides the circumcenter and circumradius of the three kinds of
//! finite simplices the alpha complex assigns radii to: tetrahedra, triangles
//! and segments. These are *constructions* (inexact `f64` arithmetic); every
//! topological decision uses the exact predicates in
//! [`crate::geometry::predicates`] instead.
//!
//! The circumcenter is found by solving the perpendicular-bisector system
//!
//! ```text
//! A x = B,   A = rows (x_i - x_0),   B_i = |x_i - x_0|² / 2
//! ```
//!
//! for the offset `x` of the center from `x_0`. For a triangle embedded in 3D
//! the missing third row is the triangle normal with a zero right-hand side,
//! which pins the center to the triangle's plane.

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

use crate::geometry::point::Point;

/// Errors that can occur while computing a circumcenter.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CircumcenterError {
    /// The simplex is degenerate (flat tetrahedron or collinear triangle).
    #[error("Degenerate simplex: {message}")]
    DegenerateSimplex {
        /// Description of the degeneracy.
        message: String,
    },
    /// The solve produced a non-finite center.
    #[error("Circumcenter is not finite")]
    NonFiniteResult,
}

fn solve_offset(rows: [Vector3<f64>; 3], rhs: Vector3<f64>) -> Result<Vector3<f64>, CircumcenterError> {
    let matrix = Matrix3::from_rows(&[rows[0].transpose(), rows[1].transpose(), rows[2].transpose()]);
    let offset = matrix
        .lu()
        .solve(&rhs)
        .ok_or_else(|| CircumcenterError::DegenerateSimplex {
            message: "bisector system is singular".to_string(),
        })?;
    if offset.iter().all(|c| c.is_finite()) {
        Ok(offset)
    } else {
        Err(CircumcenterError::NonFiniteResult)
    }
}

/// Circumcenter of the tetrahedron `(a, b, c, d)`.
///
/// # Errors
///
/// Returns [`CircumcenterError::DegenerateSimplex`] if the four points are coplanar.
///
/// # Example
///
/// ```
/// use delaunay_alpha::geometry::point::Point;
/// use delaunay_alpha::geometry::util::tetrahedron_circumcenter;
///
/// let center = tetrahedron_circumcenter(
///     &Point::new([0.0, 0.0, 0.0]),
///     &Point::new([1.0, 0.0, 0.0]),
///     &Point::new([0.0, 1.0, 0.0]),
///     &Point::new([0.0, 0.0, 1.0]),
/// )
/// .unwrap();
/// assert!((center.x() - 0.5).abs() < 1e-12);
/// assert!((center.y() - 0.5).abs() < 1e-12);
/// assert!((center.z() - 0.5).abs() < 1e-12);
/// ```
pub fn tetrahedron_circumcenter(
    a: &Point,
    b: &Point,
    c: &Point,
    d: &Point,
) -> Result<Point, CircumcenterError> {
    let origin = a.to_vector();
    let u = b.to_vector() - origin;
    let v = c.to_vector() - origin;
    let w = d.to_vector() - origin;
    let rhs = Vector3::new(u.norm_squared(), v.norm_squared(), w.norm_squared()) * 0.5;
    let offset = solve_offset([u, v, w], rhs)?;
    Ok(Point::from_vector(&(origin + offset)))
}

/// Circumradius of the tetrahedron `(a, b, c, d)`.
///
/// # Errors
///
/// Returns an error if the tetrahedron is flat.
pub fn tetrahedron_circumradius(
    a: &Point,
    b: &Point,
    c: &Point,
    d: &Point,
) -> Result<f64, CircumcenterError> {
    let center = tetrahedron_circumcenter(a, b, c, d)?;
    Ok(circumradius_with_center(&[*a, *b, *c, *d], &center))
}

/// Circumcenter of the triangle `(a, b, c)`, in the triangle's plane.
///
/// This is also the center of the triangle's *diametral sphere*: the smallest
/// sphere with `a`, `b` and `c` on its boundary.
///
/// # Errors
///
/// Returns [`CircumcenterError::DegenerateSimplex`] if the points are collinear.
pub fn triangle_circumcenter(a: &Point, b: &Point, c: &Point) -> Result<Point, CircumcenterError> {
    let origin = a.to_vector();
    let u = b.to_vector() - origin;
    let v = c.to_vector() - origin;
    let normal = u.cross(&v);
    if normal.norm_squared() == 0.0 {
        return Err(CircumcenterError::DegenerateSimplex {
            message: "triangle vertices are collinear".to_string(),
        });
    }
    let rhs = Vector3::new(u.norm_squared() * 0.5, v.norm_squared() * 0.5, 0.0);
    let offset = solve_offset([u, v, normal], rhs)?;
    Ok(Point::from_vector(&(origin + offset)))
}

/// Circumradius of the triangle `(a, b, c)`.
///
/// # Errors
///
/// Returns an error if the points are collinear.
///
/// # Example
///
/// ```
/// use delaunay_alpha::geometry::point::Point;
/// use delaunay_alpha::geometry::util::triangle_circumradius;
///
/// // Equilateral triangle with unit edges: R = 1/sqrt(3)
/// let r = triangle_circumradius(
///     &Point::new([0.0, 0.0, 0.0]),
///     &Point::new([1.0, 0.0, 0.0]),
///     &Point::new([0.5, 3.0_f64.sqrt() / 2.0, 0.0]),
/// )
/// .unwrap();
/// assert!((r - 1.0 / 3.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn triangle_circumradius(a: &Point, b: &Point, c: &Point) -> Result<f64, CircumcenterError> {
    let center = triangle_circumcenter(a, b, c)?;
    Ok(circumradius_with_center(&[*a, *b, *c], &center))
}

/// Radius of the smallest sphere through `a` and `b` (half the segment length).
#[must_use]
pub fn segment_circumradius(a: &Point, b: &Point) -> f64 {
    a.distance(b) * 0.5
}

/// Circumradius given a precomputed center.
///
/// Averages the distances to all points so that rounding in the center does
/// not favour the first vertex.
#[must_use]
pub fn circumradius_with_center(points: &[Point], center: &Point) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = points.len() as f64;
    points.iter().map(|p| p.distance(center)).sum::<f64>() / count
}

/// Returns `true` if `p` lies strictly inside the sphere centred at `center`
/// with squared radius `radius_squared`.
#[must_use]
#[inline]
pub fn strictly_inside_ball(p: &Point, center: &Point, radius_squared: f64) -> bool {
    p.distance_squared(center) < radius_squared
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn regular_tetrahedron_circumradius() {
        let h = (2.0_f64 / 3.0).sqrt();
        let s = 3.0_f64.sqrt();
        let a = Point::new([0.0, 0.0, 0.0]);
        let b = Point::new([1.0, 0.0, 0.0]);
        let c = Point::new([0.5, s / 2.0, 0.0]);
        let d = Point::new([0.5, s / 6.0, h]);
        let r = tetrahedron_circumradius(&a, &b, &c, &d).unwrap();
        assert_relative_eq!(r, 6.0_f64.sqrt() / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn flat_tetrahedron_is_degenerate() {
        let result = tetrahedron_circumcenter(
            &Point::new([0.0, 0.0, 0.0]),
            &Point::new([1.0, 0.0, 0.0]),
            &Point::new([0.0, 1.0, 0.0]),
            &Point::new([1.0, 1.0, 0.0]),
        );
        assert!(matches!(
            result,
            Err(CircumcenterError::DegenerateSimplex { .. })
        ));
    }

    #[test]
    fn triangle_center_lies_in_plane() {
        let a = Point::new([1.0, 0.0, 0.0]);
        let b = Point::new([0.0, 1.0, 0.0]);
        let c = Point::new([0.0, 0.0, 1.0]);
        let center = triangle_circumcenter(&a, &b, &c).unwrap();
        let third = 1.0 / 3.0;
        assert_relative_eq!(center.x(), third, epsilon = 1e-12);
        assert_relative_eq!(center.y(), third, epsilon = 1e-12);
        assert_relative_eq!(center.z(), third, epsilon = 1e-12);
    }

    #[test]
    fn right_triangle_center_is_hypotenuse_midpoint() {
        let a = Point::new([0.0, 0.0, 2.0]);
        let b = Point::new([4.0, 0.0, 2.0]);
        let c = Point::new([0.0, 3.0, 2.0]);
        let center = triangle_circumcenter(&a, &b, &c).unwrap();
        assert_relative_eq!(center.x(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(center.y(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(center.z(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(triangle_circumradius(&a, &b, &c).unwrap(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn collinear_triangle_is_degenerate() {
        assert!(
            triangle_circumcenter(
                &Point::new([0.0, 0.0, 0.0]),
                &Point::new([1.0, 1.0, 1.0]),
                &Point::new([2.0, 2.0, 2.0]),
            )
            .is_err()
        );
    }

    #[test]
    fn segment_radius_and_ball_test() {
        let a = Point::new([0.0, 0.0, 0.0]);
        let b = Point::new([2.0, 0.0, 0.0]);
        assert_relative_eq!(segment_circumradius(&a, &b), 1.0);
        let center = a.midpoint(&b);
        assert!(strictly_inside_ball(&Point::new([1.0, 0.5, 0.0]), &center, 1.0));
        assert!(!strictly_inside_ball(&Point::new([1.0, 1.0, 0.0]), &center, 1.0));
    }
}
