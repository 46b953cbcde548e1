//! Random and structured point generation.
//!
//! Used by tests and benchmarks to produce reproducible inputs: uniform
//! samples in a box, samples on a sphere (a closed surface whose alpha shape
//! is a topological sphere), and regular grids (maximally degenerate input:
//! many cospherical and coplanar subsets).

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::geometry::point::Point;

/// Errors that can occur during point generation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RandomPointGenerationError {
    /// The coordinate range is empty or not finite.
    #[error("Invalid coordinate range: min {min} must be less than max {max}")]
    InvalidRange {
        /// Lower bound of the range.
        min: f64,
        /// Upper bound of the range.
        max: f64,
    },
    /// A size parameter is zero where at least one point is required.
    #[error("Invalid point count: {n_points}")]
    InvalidPointCount {
        /// The requested number of points.
        n_points: usize,
    },
    /// The sphere radius is not positive.
    #[error("Invalid sphere radius: {radius}")]
    InvalidRadius {
        /// The requested radius.
        radius: f64,
    },
}

/// Generate `n_points` uniformly distributed points in the cube `[min, max)³`.
///
/// The same `seed` always yields the same points.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] if `range.0 >= range.1`
/// or either bound is not finite.
///
/// # Example
///
/// ```
/// use delaunay_alpha::geometry::util::generate_random_points_seeded;
///
/// let a = generate_random_points_seeded(10, (-1.0, 1.0), 7).unwrap();
/// let b = generate_random_points_seeded(10, (-1.0, 1.0), 7).unwrap();
/// assert_eq!(a, b);
/// assert!(a.iter().all(|p| p.coords().iter().all(|c| (-1.0..1.0).contains(c))));
/// ```
pub fn generate_random_points_seeded(
    n_points: usize,
    range: (f64, f64),
    seed: u64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    if !(range.0.is_finite() && range.1.is_finite()) || range.0 >= range.1 {
        return Err(RandomPointGenerationError::InvalidRange {
            min: range.0,
            max: range.1,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let points = (0..n_points)
        .map(|_| Point::new([0.0; 3].map(|_| rng.random_range(range.0..range.1))))
        .collect();
    Ok(points)
}

/// Generate `n_points` points on the sphere of the given `radius` centred at the origin.
///
/// Directions are drawn uniformly from the unit ball by rejection and then
/// projected, which gives a uniform distribution on the sphere.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRadius`] if `radius` is not a
/// positive finite number.
pub fn generate_random_points_on_sphere_seeded(
    n_points: usize,
    radius: f64,
    seed: u64,
) -> Result<Vec<Point>, RandomPointGenerationError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(RandomPointGenerationError::InvalidRadius { radius });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(n_points);
    while points.len() < n_points {
        let candidate = Point::new([0.0; 3].map(|_| rng.random_range(-1.0..1.0)));
        let v = candidate.to_vector();
        let norm = v.norm();
        if norm > 1e-3 && norm <= 1.0 {
            points.push(Point::from_vector(&(v * (radius / norm))));
        }
    }
    Ok(points)
}

/// Generate the regular grid `{offset + spacing * (i, j, k)}` with
/// `points_per_dim` samples along each axis.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidPointCount`] if
/// `points_per_dim` is zero.
pub fn generate_grid_points(
    points_per_dim: usize,
    spacing: f64,
    offset: [f64; 3],
) -> Result<Vec<Point>, RandomPointGenerationError> {
    if points_per_dim == 0 {
        return Err(RandomPointGenerationError::InvalidPointCount {
            n_points: points_per_dim,
        });
    }

    let mut points = Vec::with_capacity(points_per_dim.pow(3));
    for i in 0..points_per_dim {
        for j in 0..points_per_dim {
            for k in 0..points_per_dim {
                #[allow(clippy::cast_precision_loss)]
                let step = [i as f64, j as f64, k as f64];
                points.push(Point::new([
                    offset[0] + spacing * step[0],
                    offset[1] + spacing * step[1],
                    offset[2] + spacing * step[2],
                ]));
            }
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn random_points_are_reproducible_and_in_range() {
        let a = generate_random_points_seeded(50, (0.0, 2.0), 123).unwrap();
        let b = generate_random_points_seeded(50, (0.0, 2.0), 123).unwrap();
        let c = generate_random_points_seeded(50, (0.0, 2.0), 124).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(Point::is_finite));
        assert!(
            a.iter()
                .all(|p| p.coords().iter().all(|&x| (0.0..2.0).contains(&x)))
        );
    }

    #[test]
    fn invalid_range_is_rejected() {
        assert!(matches!(
            generate_random_points_seeded(3, (1.0, 1.0), 0),
            Err(RandomPointGenerationError::InvalidRange { .. })
        ));
        assert!(generate_random_points_seeded(3, (f64::NAN, 1.0), 0).is_err());
    }

    #[test]
    fn sphere_points_have_requested_radius() {
        let pts = generate_random_points_on_sphere_seeded(40, 2.5, 9).unwrap();
        assert_eq!(pts.len(), 40);
        for p in &pts {
            assert_relative_eq!(p.distance(&Point::origin()), 2.5, epsilon = 1e-12);
        }
        assert!(generate_random_points_on_sphere_seeded(4, 0.0, 9).is_err());
    }

    #[test]
    fn grid_points() {
        let pts = generate_grid_points(3, 0.5, [1.0, 0.0, 0.0]).unwrap();
        assert_eq!(pts.len(), 27);
        assert_eq!(pts[0], Point::new([1.0, 0.0, 0.0]));
        assert_eq!(pts[26], Point::new([2.0, 1.0, 1.0]));
        assert!(generate_grid_points(0, 1.0, [0.0; 3]).is_err());
    }
}
