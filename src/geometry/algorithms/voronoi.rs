//! Voronoi diagram as the dual of a Delaunay triangulation.
//!
//! - Each finite tetrahedron contributes one Voronoi vertex, its circumcenter.
//! - Each triangle shared by two finite tetrahedra contributes a finite
//!   Voronoi edge joining their circumcenters.
//! - Each convex hull triangle contributes a Voronoi ray starting at the
//!   circumcenter of its finite tetrahedron and pointing along the triangle's
//!   outward normal.

use crate::core::collections::DenseCellMap;
use crate::core::delaunay_triangulation::DelaunayTriangulation;
use crate::geometry::point::Point;
use crate::geometry::util::{CircumcenterError, tetrahedron_circumcenter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building the Voronoi dual.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VoronoiError {
    /// A tetrahedron's circumcenter could not be constructed.
    #[error("Circumcenter of tetrahedron {vertices:?} failed: {source}")]
    Circumcenter {
        /// Input indices of the tetrahedron.
        vertices: [usize; 4],
        /// Underlying failure.
        #[source]
        source: CircumcenterError,
    },
}

/// An unbounded Voronoi edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoronoiRay {
    /// Index into [`VoronoiDiagram::vertices`] of the ray's origin.
    pub origin: usize,
    /// Unit direction (outward normal of the dual hull triangle).
    pub direction: [f64; 3],
    /// Input indices of the dual hull triangle.
    pub dual_facet: [usize; 3],
}

/// Voronoi vertices, finite edges and rays.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VoronoiDiagram {
    vertices: Vec<Point>,
    edges: Vec<[usize; 2]>,
    rays: Vec<VoronoiRay>,
}

impl VoronoiDiagram {
    /// Builds the dual of `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`VoronoiError::Circumcenter`] if a circumcenter cannot be constructed.
    pub fn from_triangulation(dt: &DelaunayTriangulation) -> Result<Self, VoronoiError> {
        let tds = dt.tds();
        let mut index: DenseCellMap<usize> = DenseCellMap::new();
        let mut vertices = Vec::with_capacity(dt.number_of_cells());
        for (ckey, cell) in tds.finite_cells() {
            let Some([a, b, c, d]) = tds.cell_points(ckey) else {
                continue;
            };
            let center = tetrahedron_circumcenter(&a, &b, &c, &d).map_err(|source| {
                VoronoiError::Circumcenter {
                    vertices: cell
                        .vertices()
                        .map(|v| dt.vertex_index(v).unwrap_or(usize::MAX)),
                    source,
                }
            })?;
            index.insert(ckey, vertices.len());
            vertices.push(center);
        }

        let mut edges = Vec::new();
        let mut rays = Vec::new();
        for facet in tds.finite_facets() {
            let Some(&origin) = index.get(facet.cell()) else {
                continue;
            };
            let Some(mirror) = tds.mirror_facet(facet) else {
                continue;
            };
            if let Some(&other) = index.get(mirror.cell()) {
                edges.push([origin, other]);
                continue;
            }
            let Some(keys) = tds.facet_vertices(facet) else {
                continue;
            };
            let Some(pts) = keys
                .iter()
                .map(|&k| tds.point(k).copied())
                .collect::<Option<Vec<_>>>()
            else {
                continue;
            };
            let normal = (pts[1].to_vector() - pts[0].to_vector())
                .cross(&(pts[2].to_vector() - pts[0].to_vector()));
            let direction = normal.try_normalize(0.0).unwrap_or(normal);
            let dual_facet = keys.map(|k| dt.vertex_index(k).unwrap_or(usize::MAX));
            rays.push(VoronoiRay {
                origin,
                direction: [direction.x, direction.y, direction.z],
                dual_facet,
            });
        }

        tracing::debug!(
            vertices = vertices.len(),
            edges = edges.len(),
            rays = rays.len(),
            "Voronoi dual built"
        );
        Ok(Self {
            vertices,
            edges,
            rays,
        })
    }

    /// Voronoi vertices (tetrahedron circumcenters).
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Finite Voronoi edges as index pairs into [`Self::vertices`].
    #[must_use]
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Unbounded Voronoi edges.
    #[must_use]
    pub fn rays(&self) -> &[VoronoiRay] {
        &self.rays
    }

    /// Finite edges as point pairs, ready for drawing.
    #[must_use]
    pub fn edge_segments(&self) -> Vec<[Point; 2]> {
        self.edges
            .iter()
            .map(|&[a, b]| [self.vertices[a], self.vertices[b]])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_tetrahedron_has_one_vertex_and_four_rays() {
        let points = vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ];
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let voronoi = VoronoiDiagram::from_triangulation(&dt).unwrap();
        assert_eq!(voronoi.vertices().len(), 1);
        assert!(voronoi.edges().is_empty());
        assert_eq!(voronoi.rays().len(), 4);
        let center = voronoi.vertices()[0];
        assert_relative_eq!(center.x(), 0.5, epsilon = 1e-12);

        // The ray dual to the bottom face points down.
        let bottom = voronoi
            .rays()
            .iter()
            .find(|r| {
                let mut f = r.dual_facet;
                f.sort_unstable();
                f == [0, 1, 2]
            })
            .unwrap();
        assert_relative_eq!(bottom.direction[2], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn interior_facets_become_finite_edges() {
        let points = vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
            Point::new([0.2, 0.2, 0.2]),
        ];
        let dt = DelaunayTriangulation::new(&points).unwrap();
        let voronoi = VoronoiDiagram::from_triangulation(&dt).unwrap();
        assert_eq!(voronoi.vertices().len(), 4);
        assert_eq!(voronoi.edges().len(), 6);
        assert_eq!(voronoi.rays().len(), 4);
        assert_eq!(voronoi.edge_segments().len(), 6);
    }
}
