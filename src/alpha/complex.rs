//! The alpha complex: critical α values for every finite simplex.
//!
//! [`AlphaComplex::new`] walks a finished [`DelaunayTriangulation`] once and
//! records an [`AlphaInterval`] for every finite tetrahedron, triangle, edge and
//! vertex. Afterwards the triangulation is no longer needed for queries; every
//! α query is a filter over these tables (see [`AlphaShape`]).
//!
//! # Interval rules
//!
//! - **Tetrahedron**: interior from its circumradius on.
//! - **Triangle**: regular from the smaller circumradius of its finite
//!   incident tetrahedra, interior from the larger one (never, on the hull).
//!   Singular from its own circumradius if no opposite vertex lies strictly
//!   inside its diametral sphere.
//! - **Edge**: regular once any incident triangle is a member, interior once
//!   all of them are interior. Singular from half its length if no vertex of
//!   its link lies strictly inside its diametral sphere.
//! - **Vertex**: singular from `α = 0`, regular once an incident edge is a
//!   member, interior once all incident edges are interior.
//!
//! Radii are constructions in `f64`; the attachment tests compare squared
//! distances to the constructed centers.
//! The edge test is the sign of `(a - c) · (b - c)` evaluated in `f64`,
//! which is negative exactly when `c` lies strictly inside the diametral
//! sphere of `ab`; no center is constructed for it.

use crate::alpha::interval::{AlphaInterval, SimplexClassification};
use crate::alpha::shape::{AlphaQueryError, AlphaShape, AlphaShapeMode};
use crate::core::collections::{DenseCellMap, Entry, FastHashMap, fast_hash_map_with_capacity};
use crate::core::delaunay_triangulation::DelaunayTriangulation;
use crate::core::triangulation_data_structure::{CellKey, VertexKey};
use crate::geometry::point::Point;
use crate::geometry::util::{
    segment_circumradius, strictly_inside_ball, tetrahedron_circumradius, triangle_circumcenter,
};
use serde::{Deserialize, Serialize};

/// Radius assigned to a simplex whose circumsphere cannot be constructed.
///
/// Large but finite, so such a simplex still joins the complex at `α = +∞`.
const DEGENERATE_RADIUS: f64 = f64::MAX;

/// A finite tetrahedron of the complex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaCell {
    /// Input indices, positively oriented.
    pub vertices: [usize; 4],
    /// Critical values (`regular == interior == circumradius`).
    pub interval: AlphaInterval,
}

/// A finite triangle of the complex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaFacet {
    /// Input indices, ordered with the normal pointing out of `cells[0]`.
    pub vertices: [usize; 3],
    /// Indices into [`AlphaComplex::cells`] of the incident finite tetrahedra.
    /// `cells[1]` is `None` for convex hull facets.
    pub cells: [Option<usize>; 2],
    /// Critical values.
    pub interval: AlphaInterval,
}

/// A finite edge of the complex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaEdge {
    /// Input indices, smaller first.
    pub vertices: [usize; 2],
    /// Critical values.
    pub interval: AlphaInterval,
}

/// A vertex of the complex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaVertex {
    /// Input index.
    pub index: usize,
    /// Critical values.
    pub interval: AlphaInterval,
}

/// Per-simplex α intervals of a Delaunay triangulation.
#[derive(Debug, Clone)]
pub struct AlphaComplex {
    points: Vec<Point>,
    cells: Vec<AlphaCell>,
    facets: Vec<AlphaFacet>,
    edges: Vec<AlphaEdge>,
    vertices: Vec<AlphaVertex>,
}

/// Running min/max over the cofaces of an edge or vertex.
struct Accumulator {
    regular: f64,
    interior: f64,
    attached: bool,
}

impl Accumulator {
    const fn new() -> Self {
        Self {
            regular: f64::INFINITY,
            interior: 0.0,
            attached: false,
        }
    }

    fn add(&mut self, coface: &AlphaInterval) {
        self.regular = self.regular.min(coface.member());
        self.interior = self.interior.max(coface.interior);
    }
}

impl AlphaComplex {
    /// Computes the intervals of every finite simplex of `dt`.
    #[must_use]
    pub fn new(dt: &DelaunayTriangulation) -> Self {
        let tds = dt.tds();
        let points = dt.points().to_vec();

        // ===== Tetrahedra =====
        let mut cell_index: DenseCellMap<usize> = DenseCellMap::new();
        let mut cells = Vec::with_capacity(dt.number_of_cells());
        for (ckey, cell) in tds.finite_cells() {
            let (Some(vertices), Some([a, b, c, d])) = (
                indices(dt, cell.vertices()),
                tds.cell_points(ckey),
            ) else {
                continue;
            };
            let radius = tetrahedron_circumradius(&a, &b, &c, &d).unwrap_or_else(|e| {
                tracing::warn!(?vertices, error = %e, "degenerate tetrahedron in alpha complex");
                DEGENERATE_RADIUS
            });
            cell_index.insert(ckey, cells.len());
            cells.push(AlphaCell {
                vertices,
                interval: AlphaInterval::cell(radius),
            });
        }

        // ===== Triangles =====
        let finite_facets = tds.finite_facets();
        let mut facets = Vec::with_capacity(finite_facets.len());
        for handle in finite_facets {
            let Some(keys) = tds.facet_vertices(handle) else {
                continue;
            };
            let Some(vertices) = indices(dt, &keys) else {
                continue;
            };
            let Some(&c0) = cell_index.get(handle.cell()) else {
                continue;
            };
            let mirror = tds.mirror_facet(handle);
            let c1 = mirror.and_then(|m| cell_index.get(m.cell()).copied());

            let mut opposite = Vec::with_capacity(2);
            if let Some(p) = opposite_point(dt, handle.cell(), handle.index()) {
                opposite.push(p);
            }
            if let Some(m) = mirror.filter(|_| c1.is_some()) {
                if let Some(p) = opposite_point(dt, m.cell(), m.index()) {
                    opposite.push(p);
                }
            }

            let [a, b, c] = vertices.map(|i| points[i]);
            let singular = triangle_circumcenter(&a, &b, &c).ok().and_then(|center| {
                let r2 = center.distance_squared(&a);
                let attached = opposite.iter().any(|p| strictly_inside_ball(p, &center, r2));
                (!attached).then(|| r2.sqrt())
            });

            let r0 = cells[c0].interval.regular;
            let (regular, interior) = match c1 {
                Some(c1) => {
                    let r1 = cells[c1].interval.regular;
                    (r0.min(r1), r0.max(r1))
                }
                None => (r0, f64::INFINITY),
            };
            facets.push(AlphaFacet {
                vertices,
                cells: [Some(c0), c1],
                interval: AlphaInterval::new(singular, regular, interior),
            });
        }

        // ===== Edges =====
        let mut edge_slots: FastHashMap<[usize; 2], usize> =
            fast_hash_map_with_capacity(facets.len() * 3 / 2 + 1);
        let mut edge_keys: Vec<[usize; 2]> = Vec::new();
        let mut edge_acc: Vec<Accumulator> = Vec::new();
        for facet in &facets {
            let v = facet.vertices;
            for (i, j, k) in [(0, 1, 2), (1, 2, 0), (2, 0, 1)] {
                let key = [v[i].min(v[j]), v[i].max(v[j])];
                let slot = match edge_slots.entry(key) {
                    Entry::Occupied(e) => *e.get(),
                    Entry::Vacant(e) => {
                        edge_keys.push(key);
                        edge_acc.push(Accumulator::new());
                        *e.insert(edge_acc.len() - 1)
                    }
                };
                let acc = &mut edge_acc[slot];
                acc.add(&facet.interval);
                let (pa, pb, pc) = (
                    points[v[i]].to_vector(),
                    points[v[j]].to_vector(),
                    points[v[k]].to_vector(),
                );
                if (pa - pc).dot(&(pb - pc)) < 0.0 {
                    acc.attached = true;
                }
            }
        }
        let edges: Vec<AlphaEdge> = edge_keys
            .into_iter()
            .zip(edge_acc)
            .map(|(vertices, acc)| {
                let singular = (!acc.attached)
                    .then(|| segment_circumradius(&points[vertices[0]], &points[vertices[1]]));
                AlphaEdge {
                    vertices,
                    interval: AlphaInterval::new(singular, acc.regular, acc.interior),
                }
            })
            .collect();

        // ===== Vertices =====
        let mut vertex_acc: Vec<Option<Accumulator>> = (0..points.len()).map(|_| None).collect();
        for edge in &edges {
            for &v in &edge.vertices {
                vertex_acc[v]
                    .get_or_insert_with(Accumulator::new)
                    .add(&edge.interval);
            }
        }
        let vertices: Vec<AlphaVertex> = vertex_acc
            .into_iter()
            .enumerate()
            .filter_map(|(index, acc)| {
                let acc = acc?;
                Some(AlphaVertex {
                    index,
                    interval: AlphaInterval::new(Some(0.0), acc.regular, acc.interior),
                })
            })
            .collect();

        tracing::debug!(
            cells = cells.len(),
            facets = facets.len(),
            edges = edges.len(),
            vertices = vertices.len(),
            "alpha complex built"
        );

        Self {
            points,
            cells,
            facets,
            edges,
            vertices,
        }
    }

    /// The input points (indexed by the simplices' vertex indices).
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Finite tetrahedra with their intervals.
    #[must_use]
    pub fn cells(&self) -> &[AlphaCell] {
        &self.cells
    }

    /// Finite triangles with their intervals.
    #[must_use]
    pub fn facets(&self) -> &[AlphaFacet] {
        &self.facets
    }

    /// Finite edges with their intervals.
    #[must_use]
    pub fn edges(&self) -> &[AlphaEdge] {
        &self.edges
    }

    /// Vertices with their intervals (merged duplicates are absent).
    #[must_use]
    pub fn vertices(&self) -> &[AlphaVertex] {
        &self.vertices
    }

    /// Number of triangles with the given classification at `alpha`.
    #[must_use]
    pub fn count_facets(&self, alpha: f64, classification: SimplexClassification) -> usize {
        self.facets
            .iter()
            .filter(|f| f.interval.classify(alpha) == classification)
            .count()
    }

    /// Extracts the alpha shape at `alpha`.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaQueryError::InvalidAlpha`] for a negative or NaN `alpha`.
    pub fn shape(&self, alpha: f64, mode: AlphaShapeMode) -> Result<AlphaShape, AlphaQueryError> {
        AlphaShape::from_complex(self, alpha, mode)
    }
}

fn indices<const N: usize>(
    dt: &DelaunayTriangulation,
    keys: &[VertexKey; N],
) -> Option<[usize; N]> {
    let mut out = [0; N];
    for (slot, &vkey) in out.iter_mut().zip(keys) {
        *slot = dt.vertex_index(vkey)?;
    }
    Some(out)
}

/// Position of vertex `i` of `ckey`, if it is finite.
fn opposite_point(
    dt: &DelaunayTriangulation,
    ckey: CellKey,
    i: usize,
) -> Option<Point> {
    let tds = dt.tds();
    let vkey = *tds.cell(ckey)?.vertices().get(i)?;
    tds.point(vkey).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn regular_tetrahedron() -> Vec<Point> {
        let h = 0.5;
        let s = 1.0 / (2.0 * std::f64::consts::SQRT_2);
        // Alternate cube corners scaled to edge length 1.
        vec![
            Point::new([s, s, s]),
            Point::new([s, -s, -s]),
            Point::new([-s, s, -s]),
            Point::new([-s, -s, s]),
        ]
        .into_iter()
        .map(|p| Point::new(p.coords().map(|c| c + h)))
        .collect()
    }

    #[test]
    fn regular_tetrahedron_intervals() {
        let dt = DelaunayTriangulation::new(&regular_tetrahedron()).unwrap();
        let complex = AlphaComplex::new(&dt);
        let r = 6.0_f64.sqrt() / 4.0;
        let rf = 1.0 / 3.0_f64.sqrt();

        assert_eq!(complex.cells().len(), 1);
        assert_relative_eq!(complex.cells()[0].interval.regular, r, epsilon = 1e-12);

        assert_eq!(complex.facets().len(), 4);
        for facet in complex.facets() {
            assert_eq!(facet.cells[1], None);
            assert_relative_eq!(facet.interval.singular.unwrap(), rf, epsilon = 1e-12);
            assert_relative_eq!(facet.interval.regular, r, epsilon = 1e-12);
            assert!(facet.interval.interior.is_infinite());
        }

        assert_eq!(complex.edges().len(), 6);
        for edge in complex.edges() {
            assert_relative_eq!(edge.interval.singular.unwrap(), 0.5, epsilon = 1e-12);
            assert_relative_eq!(edge.interval.regular, rf, epsilon = 1e-12);
        }

        assert_eq!(complex.vertices().len(), 4);
        for vertex in complex.vertices() {
            assert_eq!(vertex.interval.singular, Some(0.0));
            assert_relative_eq!(vertex.interval.regular, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn obtuse_triangle_attaches_its_long_edge() {
        // The apex sits just above the midpoint of the long edge.
        let points = vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([4.0, 0.0, 0.0]),
            Point::new([2.0, 0.5, 0.0]),
            Point::new([2.0, 0.2, 3.0]),
        ];
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let complex = AlphaComplex::new(&dt);
        let long = complex
            .edges()
            .iter()
            .find(|e| e.vertices == [0, 1])
            .unwrap();
        assert_eq!(long.interval.singular, None);
    }

    #[test]
    fn counts_split_the_facets() {
        let dt = DelaunayTriangulation::new(&regular_tetrahedron()).unwrap();
        let complex = AlphaComplex::new(&dt);
        assert_eq!(complex.count_facets(0.0, SimplexClassification::EXTERIOR), 4);
        assert_eq!(complex.count_facets(0.6, SimplexClassification::SINGULAR), 4);
        assert_eq!(complex.count_facets(1.0, SimplexClassification::REGULAR), 4);
    }
}
