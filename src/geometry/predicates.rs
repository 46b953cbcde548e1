//! Geometric predicates for 3D Delaunay triangulation.
//!
//! This module contains the two predicates every topological decision in the
//! triangulation is built on: [`orientation`] and [`in_sphere`]. Both are
//! evaluated with Shewchuk's adaptive-precision arithmetic (via the
//! `geometry-predicates` crate), so the *sign* they report is exact for any
//! finite `f64` input. A predicate therefore cannot flip between two calls on
//! the same arguments, and the degenerate outcome is reported only when the
//! configuration really is degenerate.
//!
//! # Tie-break rules
//!
//! Exact signs do not remove degeneracies, they only make them detectable.
//! Callers resolve them with fixed rules (see
//! [`crate::core::algorithms::locate`]):
//!
//! - A point on a circumsphere ([`InSphere::BOUNDARY`]) is *not* in conflict.
//! - A [`Orientation::DEGENERATE`] result never causes the point-location walk
//!   to cross a facet.
//! - [`in_sphere`] on a flat tetrahedron returns [`InSphere::BOUNDARY`].
//!
//! # References
//!
//! - Shewchuk, J. R. "Adaptive Precision Floating-Point Arithmetic and Fast Robust Geometric
//!   Predicates." Discrete & Computational Geometry 18, no. 3 (1997): 305-363.

use geometry_predicates::predicates::{insphere, orient2d, orient3d};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::point::Point;

/// Represents the position of a point relative to a circumsphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InSphere {
    /// The point is outside the circumsphere
    OUTSIDE,
    /// The point is exactly on the circumsphere (or the simplex is flat)
    BOUNDARY,
    /// The point is inside the circumsphere
    INSIDE,
}

impl fmt::Display for InSphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation of a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// `d` lies below the plane through `a, b, c`
    NEGATIVE,
    /// The four points are coplanar
    DEGENERATE,
    /// `d` lies above the plane through `a, b, c`
    POSITIVE,
}

impl Orientation {
    /// Returns the orientation as `-1`, `0` or `+1`.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::NEGATIVE => -1,
            Self::DEGENERATE => 0,
            Self::POSITIVE => 1,
        }
    }

    /// Returns the orientation of the mirrored simplex.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::NEGATIVE => Self::POSITIVE,
            Self::DEGENERATE => Self::DEGENERATE,
            Self::POSITIVE => Self::NEGATIVE,
        }
    }

    fn from_value(value: f64) -> Self {
        if value > 0.0 {
            Self::POSITIVE
        } else if value < 0.0 {
            Self::NEGATIVE
        } else {
            Self::DEGENERATE
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Determine the orientation of the tetrahedron `(a, b, c, d)`.
///
/// The result is the sign of
///
/// ```text
/// | bx-ax  by-ay  bz-az |
/// | cx-ax  cy-ay  cz-az |
/// | dx-ax  dy-ay  dz-az |
/// ```
///
/// which is the 4×4 homogeneous determinant reduced by subtracting the first
/// row. It is [`Orientation::POSITIVE`] when `d` lies on the side of the plane
/// `(a, b, c)` that the right-hand normal `(b - a) × (c - a)` points to.
///
/// # Example
///
/// ```
/// use delaunay_alpha::geometry::point::Point;
/// use delaunay_alpha::geometry::predicates::{orientation, Orientation};
///
/// let a = Point::new([0.0, 0.0, 0.0]);
/// let b = Point::new([1.0, 0.0, 0.0]);
/// let c = Point::new([0.0, 1.0, 0.0]);
/// assert_eq!(orientation(&a, &b, &c, &Point::new([0.0, 0.0, 1.0])), Orientation::POSITIVE);
/// assert_eq!(orientation(&a, &b, &c, &Point::new([0.0, 0.0, -1.0])), Orientation::NEGATIVE);
/// assert_eq!(orientation(&a, &b, &c, &Point::new([3.0, 7.0, 0.0])), Orientation::DEGENERATE);
/// ```
#[must_use]
#[inline]
pub fn orientation(a: &Point, b: &Point, c: &Point, d: &Point) -> Orientation {
    // Shewchuk's orient3d is positive when d is *below* (a, b, c).
    Orientation::from_value(-orient3d(a.into(), b.into(), c.into(), d.into()))
}

/// Check whether `p` lies inside the circumsphere of the tetrahedron `(a, b, c, d)`.
///
/// The lifted determinant is interpreted relative to the orientation of
/// `(a, b, c, d)`, so the answer does not depend on the vertex order. If the
/// tetrahedron is flat there is no circumsphere and the result is
/// [`InSphere::BOUNDARY`].
///
/// # Example
///
/// ```
/// use delaunay_alpha::geometry::point::Point;
/// use delaunay_alpha::geometry::predicates::{in_sphere, InSphere};
///
/// let a = Point::new([0.0, 0.0, 0.0]);
/// let b = Point::new([1.0, 0.0, 0.0]);
/// let c = Point::new([0.0, 1.0, 0.0]);
/// let d = Point::new([0.0, 0.0, 1.0]);
///
/// assert_eq!(in_sphere(&a, &b, &c, &d, &Point::new([0.25, 0.25, 0.25])), InSphere::INSIDE);
/// assert_eq!(in_sphere(&a, &c, &b, &d, &Point::new([0.25, 0.25, 0.25])), InSphere::INSIDE);
/// assert_eq!(in_sphere(&a, &b, &c, &d, &Point::new([2.0, 2.0, 2.0])), InSphere::OUTSIDE);
/// assert_eq!(in_sphere(&a, &b, &c, &d, &Point::new([1.0, 1.0, 0.0])), InSphere::BOUNDARY);
/// ```
#[must_use]
pub fn in_sphere(a: &Point, b: &Point, c: &Point, d: &Point, p: &Point) -> InSphere {
    let orient = orient3d(a.into(), b.into(), c.into(), d.into());
    if orient == 0.0 {
        return InSphere::BOUNDARY;
    }

    // Shewchuk's insphere is positive-inside for simplices with positive orient3d.
    let det = insphere(a.into(), b.into(), c.into(), d.into(), p.into());
    let det_norm = if orient > 0.0 { det } else { -det };

    if det_norm > 0.0 {
        InSphere::INSIDE
    } else if det_norm < 0.0 {
        InSphere::OUTSIDE
    } else {
        InSphere::BOUNDARY
    }
}

/// Returns `true` if `a`, `b` and `c` lie on a common line.
///
/// Three points are collinear exactly when all three axis-aligned projections
/// of the triangle have zero signed area, which is decided with exact 2D
/// orientation tests.
#[must_use]
pub fn are_collinear(a: &Point, b: &Point, c: &Point) -> bool {
    const PROJECTIONS: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 2)];
    PROJECTIONS.iter().all(|&(i, j)| {
        let pa = [a.coords()[i], a.coords()[j]];
        let pb = [b.coords()[i], b.coords()[j]];
        let pc = [c.coords()[i], c.coords()[j]];
        orient2d(pa, pb, pc) == 0.0
    })
}
