//! Global queries over the alpha complex: the α spectrum, solid components and
//! the α values that make the shape solid or connected.

use crate::alpha::complex::AlphaComplex;
use crate::alpha::interval::SimplexClassification;

/// Disjoint-set forest over cell indices.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
    }
}

impl AlphaComplex {
    /// Every finite, positive critical α of the complex, ascending and without repeats.
    ///
    /// The classification of some simplex changes at each of these values and
    /// nowhere else, so they are the only α worth offering on a slider.
    #[must_use]
    pub fn alpha_spectrum(&self) -> Vec<f64> {
        let intervals = self
            .cells()
            .iter()
            .map(|c| &c.interval)
            .chain(self.facets().iter().map(|f| &f.interval))
            .chain(self.edges().iter().map(|e| &e.interval))
            .chain(self.vertices().iter().map(|v| &v.interval));

        let mut values: Vec<f64> = intervals
            .flat_map(|i| [i.singular, Some(i.regular), Some(i.interior)])
            .flatten()
            .filter(|v| v.is_finite() && *v > 0.0)
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();
        values
    }

    /// Number of connected components of the solid part of the shape at `alpha`.
    ///
    /// Two interior tetrahedra belong to the same component when they are
    /// connected through triangles shared by interior tetrahedra.
    #[must_use]
    pub fn number_of_solid_components(&self, alpha: f64) -> usize {
        let cells = self.cells();
        let solid: Vec<bool> = cells
            .iter()
            .map(|c| c.interval.classify(alpha) == SimplexClassification::INTERIOR)
            .collect();

        let mut forest = UnionFind::new(cells.len());
        for facet in self.facets() {
            if let [Some(a), Some(b)] = facet.cells {
                if solid[a] && solid[b] {
                    forest.union(a, b);
                }
            }
        }

        let mut roots: Vec<usize> = (0..cells.len())
            .filter(|&c| solid[c])
            .map(|c| forest.find(c))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }

    /// The smallest α at which every vertex lies on or inside the solid.
    ///
    /// This is the largest, over the vertices, of the smallest circumradius of
    /// the tetrahedra incident to that vertex.
    #[must_use]
    pub fn find_alpha_solid(&self) -> f64 {
        let mut smallest = vec![f64::INFINITY; self.points().len()];
        for cell in self.cells() {
            for &v in &cell.vertices {
                smallest[v] = smallest[v].min(cell.interval.regular);
            }
        }
        self.vertices()
            .iter()
            .map(|v| smallest[v.index])
            .filter(|r| r.is_finite())
            .fold(0.0, f64::max)
    }

    /// The smallest spectrum value, not below [`Self::find_alpha_solid`], at
    /// which the solid has at most `max_components` components.
    ///
    /// The search is a bisection over the spectrum; the component count is
    /// treated as non-increasing in α, which holds for all but contrived inputs.
    /// Returns `None` if no such value exists (for example when
    /// `max_components` is zero).
    #[must_use]
    pub fn find_optimal_alpha(&self, max_components: usize) -> Option<f64> {
        let floor = self.find_alpha_solid();
        let spectrum: Vec<f64> = self
            .alpha_spectrum()
            .into_iter()
            .filter(|&a| a >= floor)
            .collect();
        let first = spectrum
            .partition_point(|&a| self.number_of_solid_components(a) > max_components);
        let found = spectrum.get(first).copied();
        tracing::debug!(max_components, floor, ?found, "optimal alpha search");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::delaunay_triangulation::DelaunayTriangulation;
    use crate::geometry::point::Point;

    fn two_clusters() -> AlphaComplex {
        let mut points = Vec::new();
        for offset in [0.0, 10.0] {
            points.extend([
                Point::new([offset, 0.0, 0.0]),
                Point::new([offset + 1.0, 0.0, 0.0]),
                Point::new([offset, 1.0, 0.0]),
                Point::new([offset, 0.0, 1.0]),
                Point::new([offset + 0.3, 0.3, 0.3]),
            ]);
        }
        AlphaComplex::new(&DelaunayTriangulation::new(&points).unwrap())
    }

    #[test]
    fn union_find_merges_transitively() {
        let mut forest = UnionFind::new(5);
        forest.union(0, 1);
        forest.union(3, 4);
        forest.union(1, 4);
        assert_eq!(forest.find(0), forest.find(3));
        assert_ne!(forest.find(2), forest.find(0));
    }

    #[test]
    fn spectrum_is_sorted_and_unique() {
        let complex = two_clusters();
        let spectrum = complex.alpha_spectrum();
        assert!(!spectrum.is_empty());
        assert!(spectrum.windows(2).all(|w| w[0] < w[1]));
        assert!(spectrum.iter().all(|a| a.is_finite() && *a > 0.0));
    }

    #[test]
    fn separated_clusters_form_two_components() {
        let complex = two_clusters();
        assert_eq!(complex.number_of_solid_components(0.0), 0);
        let solid = complex.find_alpha_solid();
        assert!(solid < 1.0);
        assert_eq!(complex.number_of_solid_components(solid), 2);
        assert_eq!(complex.number_of_solid_components(f64::INFINITY), 1);
    }

    #[test]
    fn optimal_alpha_bridges_the_clusters() {
        let complex = two_clusters();
        let two = complex.find_optimal_alpha(2).unwrap();
        assert!(complex.number_of_solid_components(two) <= 2);
        let one = complex.find_optimal_alpha(1).unwrap();
        assert_eq!(complex.number_of_solid_components(one), 1);
        assert!(one > 1.0);
        assert_eq!(complex.find_optimal_alpha(0), None);
    }
}
