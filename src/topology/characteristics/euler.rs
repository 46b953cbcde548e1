//! Euler characteristic of tetrahedralizations and extracted boundary surfaces.
//!
//! χ = Σ(-1)^k · `f_k`, where `f_k` is the number of `k`-simplices.
//!
//! - The finite part of a 3D Delaunay triangulation is a topological ball: χ = 1.
//! - Its convex hull, and any closed connected genus-0 alpha-shape surface, is a
//!   2-sphere: χ = 2.
//!
//! # Examples
//!
//! ```rust
//! use delaunay_alpha::prelude::*;
//! use delaunay_alpha::topology::characteristics::euler;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//! ];
//! let dt = DelaunayTriangulation::new(&points).unwrap();
//!
//! let counts = euler::count_simplices(&dt);
//! assert_eq!(euler::euler_characteristic(&counts), 1);
//! ```

use crate::alpha::shape::AlphaShape;
use crate::core::collections::{FastHashMap, FastHashSet};
use crate::core::delaunay_triangulation::DelaunayTriangulation;

/// Counts of k-simplices, the **f-vector** (f₀, f₁, ..., `f_D`).
///
/// # Examples
///
/// ```rust
/// use delaunay_alpha::topology::characteristics::euler::FVector;
///
/// let counts = FVector {
///     by_dim: vec![4, 6, 4, 1],
/// };
/// assert_eq!(counts.count(2), 4);
/// assert_eq!(counts.count(4), 0);
/// assert_eq!(counts.dimension(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FVector {
    /// `by_dim[k]` = `f_k` = number of `k`-simplices
    pub by_dim: Vec<usize>,
}

impl FVector {
    /// Number of `k`-simplices, 0 if `k` is out of range.
    #[must_use]
    #[inline]
    pub fn count(&self, k: usize) -> usize {
        self.by_dim.get(k).copied().unwrap_or(0)
    }

    /// Highest dimension stored.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.by_dim.len().saturating_sub(1)
    }
}

/// Topological type of a complex, used to look up its expected χ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyClassification {
    /// Nothing to classify.
    Empty,
    /// A single D-simplex.
    SingleSimplex(usize),
    /// A D-ball with boundary.
    Ball(usize),
    /// A closed D-sphere.
    ClosedSphere(usize),
    /// Anything else (disconnected or non-manifold surfaces).
    Unknown,
}

/// The f-vector `[V, E, F, C]` of the finite tetrahedralization.
#[must_use]
pub fn count_simplices(dt: &DelaunayTriangulation) -> FVector {
    let tds = dt.tds();
    FVector {
        by_dim: vec![
            tds.number_of_vertices(),
            tds.finite_edges().len(),
            tds.finite_facets().len(),
            tds.number_of_finite_cells(),
        ],
    }
}

/// The f-vector `[V, E, F]` of the convex hull surface.
#[must_use]
pub fn count_boundary_simplices(dt: &DelaunayTriangulation) -> FVector {
    count_surface_simplices(&dt.convex_hull_facets())
}

/// The f-vector `[V, E, F]` of a triangle soup given by vertex indices.
///
/// Vertices and edges are counted once however many triangles share them.
#[must_use]
pub fn count_surface_simplices(triangles: &[[usize; 3]]) -> FVector {
    let mut vertices: FastHashSet<usize> = FastHashSet::default();
    let mut edges: FastHashSet<[usize; 2]> = FastHashSet::default();
    for &[a, b, c] in triangles {
        vertices.extend([a, b, c]);
        for (u, v) in [(a, b), (b, c), (c, a)] {
            edges.insert([u.min(v), u.max(v)]);
        }
    }
    FVector {
        by_dim: vec![vertices.len(), edges.len(), triangles.len()],
    }
}

/// The f-vector `[V, E, F]` of the triangles of an alpha shape.
#[must_use]
pub fn count_shape_simplices(shape: &AlphaShape) -> FVector {
    let triangles: Vec<[usize; 3]> = shape.triangles().iter().map(|t| t.indices).collect();
    count_surface_simplices(&triangles)
}

/// Alternating sum χ = f₀ - f₁ + f₂ - f₃ + ...
///
/// # Examples
///
/// ```rust
/// use delaunay_alpha::topology::characteristics::euler::{FVector, euler_characteristic};
///
/// // Surface of a tetrahedron: V=4, E=6, F=4
/// let counts = FVector {
///     by_dim: vec![4, 6, 4],
/// };
/// assert_eq!(euler_characteristic(&counts), 2);
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Simplex counts won't exceed isize::MAX in practice
pub fn euler_characteristic(counts: &FVector) -> isize {
    counts
        .by_dim
        .iter()
        .enumerate()
        .map(|(k, &f_k)| {
            let sign = if k % 2 == 0 { 1 } else { -1 };
            sign * (f_k as isize)
        })
        .sum()
}

/// Returns `true` if every edge of `triangles` is shared by exactly two triangles.
#[must_use]
pub fn is_closed_surface(triangles: &[[usize; 3]]) -> bool {
    if triangles.is_empty() {
        return false;
    }
    let mut uses: FastHashMap<[usize; 2], usize> = FastHashMap::default();
    for &[a, b, c] in triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            *uses.entry([u.min(v), u.max(v)]).or_default() += 1;
        }
    }
    uses.values().all(|&n| n == 2)
}

/// Classifies the finite tetrahedralization.
///
/// With at least two tetrahedra the finite part always has a hull, so it is a ball.
#[must_use]
pub fn classify_triangulation(dt: &DelaunayTriangulation) -> TopologyClassification {
    match dt.number_of_cells() {
        0 => TopologyClassification::Empty,
        1 => TopologyClassification::SingleSimplex(3),
        _ => TopologyClassification::Ball(3),
    }
}

/// Classifies a triangle surface: closed and edge-connected surfaces are
/// reported as spheres when their χ is 2, everything else as unknown.
#[must_use]
pub fn classify_surface(triangles: &[[usize; 3]]) -> TopologyClassification {
    if triangles.is_empty() {
        return TopologyClassification::Empty;
    }
    if !is_closed_surface(triangles) || count_edge_components(triangles) != 1 {
        return TopologyClassification::Unknown;
    }
    if euler_characteristic(&count_surface_simplices(triangles)) == 2 {
        TopologyClassification::ClosedSphere(2)
    } else {
        TopologyClassification::Unknown
    }
}

fn count_edge_components(triangles: &[[usize; 3]]) -> usize {
    let mut by_edge: FastHashMap<[usize; 2], Vec<usize>> = FastHashMap::default();
    for (t, &[a, b, c]) in triangles.iter().enumerate() {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            by_edge.entry([u.min(v), u.max(v)]).or_default().push(t);
        }
    }

    let mut seen = vec![false; triangles.len()];
    let mut components = 0;
    for start in 0..triangles.len() {
        if seen[start] {
            continue;
        }
        components += 1;
        seen[start] = true;
        let mut stack = vec![start];
        while let Some(t) = stack.pop() {
            let [a, b, c] = triangles[t];
            for (u, v) in [(a, b), (b, c), (c, a)] {
                for &next in by_edge.get(&[u.min(v), u.max(v)]).into_iter().flatten() {
                    if !seen[next] {
                        seen[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
    }
    components
}

/// Expected χ for a classification.
///
/// - `Empty`: χ = 0
/// - `SingleSimplex(_)`, `Ball(_)`: χ = 1
/// - `ClosedSphere(d)`: χ = 1 + (-1)^d
/// - `Unknown`: None
#[must_use]
pub fn expected_chi_for(classification: &TopologyClassification) -> Option<isize> {
    match classification {
        TopologyClassification::Empty => Some(0),
        TopologyClassification::SingleSimplex(_) | TopologyClassification::Ball(_) => Some(1),
        TopologyClassification::ClosedSphere(d) => {
            // χ(S^d) = 1 + (-1)^d
            Some(1 + if d % 2 == 0 { 1 } else { -1 })
        }
        TopologyClassification::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha::complex::AlphaComplex;
    use crate::alpha::shape::AlphaShapeMode;
    use crate::geometry::point::Point;
    use crate::geometry::util::generate_random_points_seeded;

    fn unit_tetrahedron() -> Vec<Point> {
        vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn test_simplex_counts() {
        let counts = FVector {
            by_dim: vec![3, 3, 1],
        };
        assert_eq!(counts.count(0), 3);
        assert_eq!(counts.count(3), 0);
        assert_eq!(counts.dimension(), 2);
    }

    #[test]
    fn test_single_tetrahedron() {
        let dt = DelaunayTriangulation::new(&unit_tetrahedron()).unwrap();
        let counts = count_simplices(&dt);
        assert_eq!(counts.by_dim, vec![4, 6, 4, 1]);
        assert_eq!(euler_characteristic(&counts), 1);
        assert_eq!(
            classify_triangulation(&dt),
            TopologyClassification::SingleSimplex(3)
        );

        let hull = count_boundary_simplices(&dt);
        assert_eq!(hull.by_dim, vec![4, 6, 4]);
        assert_eq!(euler_characteristic(&hull), 2);
    }

    #[test]
    fn test_random_cloud_is_a_ball_with_spherical_hull() {
        let points = generate_random_points_seeded(80, (-1.0, 1.0), 11).unwrap();
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let classification = classify_triangulation(&dt);
        assert_eq!(classification, TopologyClassification::Ball(3));
        assert_eq!(
            Some(euler_characteristic(&count_simplices(&dt))),
            expected_chi_for(&classification)
        );

        let hull = dt.convex_hull_facets();
        assert!(is_closed_surface(&hull));
        assert_eq!(classify_surface(&hull), TopologyClassification::ClosedSphere(2));
    }

    #[test]
    fn test_alpha_shape_at_infinity_is_a_sphere() {
        let points = generate_random_points_seeded(40, (0.0, 1.0), 5).unwrap();
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let complex = AlphaComplex::new(&dt);
        let shape = complex.shape(f64::INFINITY, AlphaShapeMode::Regular).unwrap();
        assert_eq!(euler_characteristic(&count_shape_simplices(&shape)), 2);
    }

    #[test]
    fn test_open_and_disconnected_surfaces() {
        let single = [[0, 1, 2]];
        assert!(!is_closed_surface(&single));
        assert_eq!(euler_characteristic(&count_surface_simplices(&single)), 1);
        assert_eq!(classify_surface(&single), TopologyClassification::Unknown);

        let two_tetrahedra = [
            [0, 2, 1],
            [0, 1, 3],
            [1, 2, 3],
            [0, 3, 2],
            [4, 6, 5],
            [4, 5, 7],
            [5, 6, 7],
            [4, 7, 6],
        ];
        assert!(is_closed_surface(&two_tetrahedra));
        assert_eq!(euler_characteristic(&count_surface_simplices(&two_tetrahedra)), 4);
        assert_eq!(
            classify_surface(&two_tetrahedra),
            TopologyClassification::Unknown
        );
        assert_eq!(classify_surface(&[]), TopologyClassification::Empty);
    }

    #[test]
    fn test_expected_chi_for() {
        assert_eq!(expected_chi_for(&TopologyClassification::Empty), Some(0));
        assert_eq!(expected_chi_for(&TopologyClassification::Ball(3)), Some(1));
        assert_eq!(
            expected_chi_for(&TopologyClassification::ClosedSphere(2)),
            Some(2)
        );
        assert_eq!(expected_chi_for(&TopologyClassification::Unknown), None);
    }
}
