//! Points in three-dimensional Euclidean space.
//!
//! [`Point`] is the only geometric value type the triangulation stores. It is a
//! plain `Copy` wrapper around three `f64` coordinates with NaN-aware equality
//! and hashing (via [`OrderedFloat`]) so points can be used as map keys.
//!
//! # Examples
//!
//! ```rust
//! use delaunay_alpha::geometry::point::Point;
//!
//! let p = Point::new([1.0, 2.0, 3.0]);
//! assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
//! assert!(p.validate().is_ok());
//!
//! let bad = Point::new([f64::NAN, 0.0, 0.0]);
//! assert!(bad.validate().is_err());
//! ```

use nalgebra::Vector3;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors produced when validating point coordinates.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointValidationError {
    /// A coordinate value is NaN or infinite.
    #[error("Invalid coordinate at index {coordinate_index}: {coordinate_value} (must be finite)")]
    InvalidCoordinate {
        /// Index of the invalid coordinate (0 = x, 1 = y, 2 = z).
        coordinate_index: usize,
        /// The offending value.
        coordinate_value: f64,
    },
}

/// A point in 3D space.
///
/// Points are immutable once created; the coordinate array is private.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point {
    coords: [f64; 3],
}

impl Point {
    /// Creates a point from its `[x, y, z]` coordinates.
    #[must_use]
    #[inline]
    pub const fn new(coords: [f64; 3]) -> Self {
        Self { coords }
    }

    /// The origin `(0, 0, 0)`.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new([0.0; 3])
    }

    /// Returns a reference to the coordinate array.
    #[must_use]
    #[inline]
    pub const fn coords(&self) -> &[f64; 3] {
        &self.coords
    }

    /// Returns the x coordinate.
    #[must_use]
    #[inline]
    pub const fn x(&self) -> f64 {
        self.coords[0]
    }

    /// Returns the y coordinate.
    #[must_use]
    #[inline]
    pub const fn y(&self) -> f64 {
        self.coords[1]
    }

    /// Returns the z coordinate.
    #[must_use]
    #[inline]
    pub const fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Checks that every coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns [`PointValidationError::InvalidCoordinate`] for the first NaN or
    /// infinite coordinate.
    pub fn validate(&self) -> Result<(), PointValidationError> {
        for (coordinate_index, &coordinate_value) in self.coords.iter().enumerate() {
            if !coordinate_value.is_finite() {
                return Err(PointValidationError::InvalidCoordinate {
                    coordinate_index,
                    coordinate_value,
                });
            }
        }
        Ok(())
    }

    /// Returns `true` if all coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (self.to_vector() - other.to_vector()).norm_squared()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }

    /// Midpoint of the segment from `self` to `other`.
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::from_vector(&((self.to_vector() + other.to_vector()) * 0.5))
    }

    /// Converts to an `nalgebra` vector for constructions.
    #[must_use]
    #[inline]
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.coords[0], self.coords[1], self.coords[2])
    }

    /// Converts from an `nalgebra` vector.
    #[must_use]
    #[inline]
    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new([v.x, v.y, v.z])
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .all(|(a, b)| OrderedFloat(*a) == OrderedFloat(*b))
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for &c in &self.coords {
            OrderedFloat(c).hash(state);
        }
    }
}

impl From<[f64; 3]> for Point {
    fn from(coords: [f64; 3]) -> Self {
        Self::new(coords)
    }
}

impl From<Point> for [f64; 3] {
    fn from(point: Point) -> Self {
        point.coords
    }
}

impl From<&Point> for [f64; 3] {
    fn from(point: &Point) -> Self {
        point.coords
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.coords[0], self.coords[1], self.coords[2])
    }
}
