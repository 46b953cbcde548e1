//! Bounding boxes and unit-cube normalization of point clouds.
//!
//! Normalization centres a cloud on its bounding-box centre and divides by the
//! largest extent, so the result fits in `[-0.5, 0.5]³`. This keeps α a
//! resolution-independent parameter; the triangulation itself works at any
//! scale and never requires it.

use crate::geometry::point::Point;

/// Axis-aligned bounding box of a point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Component-wise minimum.
    pub min: Point,
    /// Component-wise maximum.
    pub max: Point,
}

impl BoundingBox {
    /// Computes the bounding box of `points`, or `None` if the slice is empty.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first.coords();
        let mut max = *first.coords();
        for p in &points[1..] {
            for (axis, &c) in p.coords().iter().enumerate() {
                min[axis] = min[axis].min(c);
                max[axis] = max[axis].max(c);
            }
        }
        Some(Self {
            min: Point::new(min),
            max: Point::new(max),
        })
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }

    /// Extent along each axis.
    #[must_use]
    pub fn extents(&self) -> [f64; 3] {
        let (lo, hi) = (self.min.coords(), self.max.coords());
        [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]]
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.min.distance(&self.max)
    }

    /// Largest extent over the three axes.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.extents().into_iter().fold(0.0, f64::max)
    }
}

/// Maps `points` into the unit cube centred at the origin.
///
/// Each point becomes `(p - center) / scale` where `center` is the bounding-box
/// centre and `scale` its largest extent. A cloud with zero extent (a single
/// repeated location) is only translated.
///
/// # Example
///
/// ```
/// use delaunay_alpha::geometry::point::Point;
/// use delaunay_alpha::geometry::util::normalize_to_unit_cube;
///
/// let pts = [Point::new([10.0, 0.0, 0.0]), Point::new([14.0, 2.0, 1.0])];
/// let normalized = normalize_to_unit_cube(&pts);
/// assert_eq!(normalized[0], Point::new([-0.5, -0.25, -0.125]));
/// assert_eq!(normalized[1], Point::new([0.5, 0.25, 0.125]));
/// ```
#[must_use]
pub fn normalize_to_unit_cube(points: &[Point]) -> Vec<Point> {
    let Some(bbox) = BoundingBox::from_points(points) else {
        return Vec::new();
    };
    let center = bbox.center().to_vector();
    let scale = bbox.max_extent();
    let factor = if scale > 0.0 { scale.recip() } else { 1.0 };
    points
        .iter()
        .map(|p| Point::from_vector(&((p.to_vector() - center) * factor)))
        .collect()
}
