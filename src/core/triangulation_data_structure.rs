//! Arena-based tetrahedral mesh with adjacency.
//!
//! [`Tds`] (triangulation data structure) owns every [`Vertex`] and [`Cell`] of
//! a 3D triangulation. Elements are stored in slot maps and refer to each other
//! by [`VertexKey`] / [`CellKey`], so removing and recreating cells during cavity
//! retriangulation never invalidates keys held elsewhere.
//!
//! # Infinite vertex
//!
//! The structure always contains one sentinel vertex at infinity. Every facet
//! of the convex hull is shared by one finite cell and one *infinite* cell (a
//! cell that has the infinite vertex among its four vertices), so the cells
//! form a closed combinatorial 3-sphere: every cell has four neighbors and
//! every facet is shared by exactly two cells. Geometric code distinguishes
//! finite and infinite cells with [`Tds::is_infinite_cell`].
//!
//! # Orientation
//!
//! Neighboring cells induce opposite orientations on their shared facet. For
//! finite cells this means all of them are positively oriented.
//!
//! # Validation
//!
//! [`Tds::is_valid`] checks the combinatorial invariants:
//!
//! - every neighbor link is mutual and the two cells share exactly the facet
//!   the link names,
//! - no facet is shared by more than two cells,
//! - every vertex's incident cell really contains it,
//! - the Euler relation of a closed 3-manifold holds (V − E + F − C = 0 with the
//!   infinite vertex counted).

use super::cell::Cell;
use super::collections::{
    Entry, FacetIndex, FastHashMap, FastHashSet, StorageMap, fast_hash_map_with_capacity,
};
use super::facet::{EdgeKey, FacetHandle, OUTWARD_FACET_VERTICES};
use super::vertex::Vertex;
use crate::geometry::point::Point;
use slotmap::new_key_type;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Structural errors found by [`Tds::is_valid`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangulationValidationError {
    /// A cell references a vertex or neighbor key that is not in the arena.
    #[error("Dangling key in cell {cell_key:?}: {message}")]
    DanglingKey {
        /// The offending cell.
        cell_key: CellKey,
        /// Description of the dangling reference.
        message: String,
    },
    /// Neighbor relationships are invalid.
    #[error("Invalid neighbor relationships: {message}")]
    InvalidNeighbors {
        /// Description of the neighbor validation failure.
        message: String,
    },
    /// A facet is shared by a number of cells other than two.
    #[error("Facet {facet:?} is shared by {count} cells (expected 2)")]
    NonManifoldFacet {
        /// Sorted vertex keys of the facet.
        facet: [VertexKey; 3],
        /// Number of cells sharing the facet.
        count: usize,
    },
    /// A cell repeats a vertex.
    #[error("Cell {cell_key:?} contains a repeated vertex")]
    DuplicateVertexInCell {
        /// The offending cell.
        cell_key: CellKey,
    },
    /// A vertex's incident-cell back-reference is missing or wrong.
    #[error("Vertex {vertex_key:?} has an invalid incident cell: {message}")]
    InvalidIncidentCell {
        /// The offending vertex.
        vertex_key: VertexKey,
        /// Description of the failure.
        message: String,
    },
    /// The simplex counts do not describe a closed 3-manifold.
    #[error("Euler characteristic {found} of the compactified triangulation (expected 0)")]
    EulerCharacteristic {
        /// The computed V − E + F − C.
        found: isize,
    },
}

// =============================================================================
// KEY TYPES
// =============================================================================

new_key_type! {
    /// Key type for accessing vertices in the storage map.
    pub struct VertexKey;
}

new_key_type! {
    /// Key type for accessing cells in the storage map.
    pub struct CellKey;
}

// =============================================================================
// STRUCT DEFINITION
// =============================================================================

/// The triangulation data structure: vertex and cell arenas plus the infinite vertex.
#[derive(Clone, Debug)]
pub struct Tds {
    vertices: StorageMap<VertexKey, Vertex>,
    cells: StorageMap<CellKey, Cell>,
    infinite_vertex: VertexKey,
}

impl Default for Tds {
    fn default() -> Self {
        Self::new()
    }
}

impl Tds {
    /// Creates an empty structure holding only the infinite vertex.
    #[must_use]
    pub fn new() -> Self {
        let mut vertices = StorageMap::with_key();
        let infinite_vertex = vertices.insert(Vertex::infinite());
        Self {
            vertices,
            cells: StorageMap::with_key(),
            infinite_vertex,
        }
    }

    // =========================================================================
    // VERTICES
    // =========================================================================

    /// Key of the sentinel vertex at infinity.
    #[must_use]
    #[inline]
    pub const fn infinite_vertex(&self) -> VertexKey {
        self.infinite_vertex
    }

    /// Returns `true` if `vkey` is the infinite vertex.
    #[must_use]
    #[inline]
    pub fn is_infinite_vertex(&self, vkey: VertexKey) -> bool {
        vkey == self.infinite_vertex
    }

    /// Adds a finite vertex (not yet linked to any cell).
    pub fn insert_vertex(&mut self, point: Point, input_index: usize) -> VertexKey {
        self.vertices.insert(Vertex::new(point, input_index))
    }

    /// Looks up a vertex.
    #[must_use]
    pub fn vertex(&self, vkey: VertexKey) -> Option<&Vertex> {
        self.vertices.get(vkey)
    }

    /// Position of a finite vertex (`None` for the infinite vertex or unknown keys).
    #[must_use]
    pub fn point(&self, vkey: VertexKey) -> Option<&Point> {
        self.vertices
            .get(vkey)
            .filter(|v| !v.is_infinite())
            .map(Vertex::point)
    }

    /// Input index of a finite vertex.
    #[must_use]
    pub fn input_index(&self, vkey: VertexKey) -> Option<usize> {
        self.vertices.get(vkey).and_then(Vertex::input_index)
    }

    /// Number of finite vertices.
    #[must_use]
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Iterates over the finite vertices.
    pub fn finite_vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> {
        self.vertices.iter().filter(|(_, v)| !v.is_infinite())
    }

    pub(crate) fn set_incident_cell(&mut self, vkey: VertexKey, ckey: CellKey) {
        if let Some(vertex) = self.vertices.get_mut(vkey) {
            vertex.incident_cell = Some(ckey);
        }
    }

    // =========================================================================
    // CELLS
    // =========================================================================

    /// Looks up a cell.
    #[must_use]
    pub fn cell(&self, ckey: CellKey) -> Option<&Cell> {
        self.cells.get(ckey)
    }

    /// Returns `true` if the cell exists in the arena.
    #[must_use]
    pub fn contains_cell(&self, ckey: CellKey) -> bool {
        self.cells.contains_key(ckey)
    }

    /// Iterates over every cell, finite and infinite.
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &Cell)> {
        self.cells.iter()
    }

    /// Iterates over the finite cells.
    pub fn finite_cells(&self) -> impl Iterator<Item = (CellKey, &Cell)> {
        let inf = self.infinite_vertex;
        self.cells
            .iter()
            .filter(move |(_, c)| !c.contains_vertex(inf))
    }

    /// Total number of cells, infinite ones included.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of finite cells.
    #[must_use]
    pub fn number_of_finite_cells(&self) -> usize {
        self.finite_cells().count()
    }

    /// Returns `true` if the cell has the infinite vertex among its vertices.
    /// Unknown keys report `false`.
    #[must_use]
    pub fn is_infinite_cell(&self, ckey: CellKey) -> bool {
        self.cells
            .get(ckey)
            .is_some_and(|c| c.contains_vertex(self.infinite_vertex))
    }

    /// Index of the infinite vertex inside `ckey`, if it is an infinite cell.
    #[must_use]
    pub fn infinite_index(&self, ckey: CellKey) -> Option<usize> {
        self.cells
            .get(ckey)
            .and_then(|c| c.index_of(self.infinite_vertex))
    }

    /// The four positions of a finite cell.
    #[must_use]
    pub fn cell_points(&self, ckey: CellKey) -> Option<[Point; 4]> {
        let cell = self.cells.get(ckey)?;
        let v = cell.vertices();
        Some([
            *self.point(v[0])?,
            *self.point(v[1])?,
            *self.point(v[2])?,
            *self.point(v[3])?,
        ])
    }

    /// Adds an unlinked cell and points its vertices at it.
    pub fn insert_cell(&mut self, vertices: [VertexKey; 4]) -> CellKey {
        let ckey = self.cells.insert(Cell::new(vertices));
        for v in vertices {
            self.set_incident_cell(v, ckey);
        }
        ckey
    }

    /// Removes a cell. Neighbor links pointing at it are left for the caller to rewire.
    pub fn remove_cell(&mut self, ckey: CellKey) -> Option<Cell> {
        self.cells.remove(ckey)
    }

    /// Sets `ckey.neighbors[i]`.
    pub(crate) fn set_neighbor(&mut self, ckey: CellKey, i: usize, neighbor: Option<CellKey>) {
        if let Some(slot) = self.cells.get_mut(ckey).and_then(|c| c.neighbors.get_mut(i)) {
            *slot = neighbor;
        }
    }

    /// Index of `ckey` inside its `i`-th neighbor: the same facet seen from the other side.
    #[must_use]
    pub fn mirror_index(&self, ckey: CellKey, i: usize) -> Option<usize> {
        let neighbor = self.cells.get(ckey)?.neighbor(i)?;
        self.cells.get(neighbor)?.neighbor_index(ckey)
    }

    /// The other handle of the same facet.
    #[must_use]
    pub fn mirror_facet(&self, facet: FacetHandle) -> Option<FacetHandle> {
        let neighbor = self.cells.get(facet.cell())?.neighbor(facet.index())?;
        let j = self.mirror_index(facet.cell(), facet.index())?;
        Some(FacetHandle::new(neighbor, FacetIndex::try_from(j).ok()?))
    }

    /// Links every pair of the given cells that share a facet.
    ///
    /// Facets of `cells` already linked elsewhere are not touched; facets that
    /// find no partner among `cells` stay unlinked.
    pub(crate) fn link_shared_facets(&mut self, cells: &[CellKey]) {
        let mut open: FastHashMap<[VertexKey; 3], (CellKey, usize)> =
            fast_hash_map_with_capacity(cells.len() * 2);
        for &ckey in cells {
            let Some(cell) = self.cells.get(ckey) else {
                continue;
            };
            let mut links = Vec::new();
            for i in 0..4 {
                if cell.neighbor(i).is_some() {
                    continue;
                }
                match open.entry(cell.sorted_facet_key(i)) {
                    Entry::Occupied(entry) => {
                        let (other, j) = entry.remove();
                        links.push((i, other, j));
                    }
                    Entry::Vacant(entry) => {
                        entry.insert((ckey, i));
                    }
                }
            }
            for (i, other, j) in links {
                self.set_neighbor(ckey, i, Some(other));
                self.set_neighbor(other, j, Some(ckey));
            }
        }
    }

    // =========================================================================
    // FACETS AND EDGES
    // =========================================================================

    /// The three vertices of a facet, ordered with the normal pointing out of
    /// the handle's cell.
    #[must_use]
    pub fn facet_vertices(&self, facet: FacetHandle) -> Option<[VertexKey; 3]> {
        let cell = self.cells.get(facet.cell())?;
        let local = OUTWARD_FACET_VERTICES.get(facet.index())?;
        let v = cell.vertices();
        Some([v[local[0]], v[local[1]], v[local[2]]])
    }

    /// Every finite facet exactly once, each taken from a finite incident cell.
    ///
    /// Hull facets are reported from their only finite cell; interior facets
    /// from the incident cell with the smaller key.
    #[must_use]
    pub fn finite_facets(&self) -> Vec<FacetHandle> {
        let mut facets = Vec::with_capacity(self.cells.len() * 2);
        for (ckey, cell) in self.finite_cells() {
            for i in 0..4u8 {
                let Some(neighbor) = cell.neighbor(usize::from(i)) else {
                    continue;
                };
                if self.is_infinite_cell(neighbor) || ckey < neighbor {
                    facets.push(FacetHandle::new(ckey, i));
                }
            }
        }
        facets
    }

    /// Facets of the convex hull, taken from their finite cell (normal points outward).
    #[must_use]
    pub fn hull_facets(&self) -> Vec<FacetHandle> {
        let mut facets = Vec::new();
        for (ckey, cell) in self.finite_cells() {
            for i in 0..4u8 {
                if cell
                    .neighbor(usize::from(i))
                    .is_some_and(|n| self.is_infinite_cell(n))
                {
                    facets.push(FacetHandle::new(ckey, i));
                }
            }
        }
        facets
    }

    /// Every finite edge once, in first-seen order over the finite cells.
    #[must_use]
    pub fn finite_edges(&self) -> Vec<EdgeKey> {
        let mut seen: FastHashSet<EdgeKey> = FastHashSet::default();
        let mut edges = Vec::new();
        for (_, cell) in self.finite_cells() {
            let v = cell.vertices();
            for i in 0..4 {
                for j in (i + 1)..4 {
                    let edge = EdgeKey::new(v[i], v[j]);
                    if seen.insert(edge) {
                        edges.push(edge);
                    }
                }
            }
        }
        edges
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Checks that neighbor links are mutual and name the shared facet.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate_neighbors(&self) -> Result<(), TriangulationValidationError> {
        for (ckey, cell) in &self.cells {
            for i in 0..4 {
                let Some(neighbor_key) = cell.neighbor(i) else {
                    return Err(TriangulationValidationError::InvalidNeighbors {
                        message: format!("cell {ckey:?} has no neighbor opposite vertex {i}"),
                    });
                };
                let Some(neighbor) = self.cells.get(neighbor_key) else {
                    return Err(TriangulationValidationError::DanglingKey {
                        cell_key: ckey,
                        message: format!("neighbor {neighbor_key:?} does not exist"),
                    });
                };
                let Some(j) = neighbor.neighbor_index(ckey) else {
                    return Err(TriangulationValidationError::InvalidNeighbors {
                        message: format!(
                            "cell {neighbor_key:?} does not point back at {ckey:?}"
                        ),
                    });
                };
                if neighbor.sorted_facet_key(j) != cell.sorted_facet_key(i) {
                    return Err(TriangulationValidationError::InvalidNeighbors {
                        message: format!(
                            "cells {ckey:?} and {neighbor_key:?} are linked but do not share a facet"
                        ),
                    });
                }
                if neighbor.contains_vertex(cell.vertices()[i]) {
                    return Err(TriangulationValidationError::InvalidNeighbors {
                        message: format!(
                            "cells {ckey:?} and {neighbor_key:?} share all four vertices"
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that every facet is shared by exactly two cells.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationValidationError::NonManifoldFacet`] for the first
    /// facet with a different count.
    pub fn validate_facet_sharing(&self) -> Result<(), TriangulationValidationError> {
        let mut counts: FastHashMap<[VertexKey; 3], usize> =
            fast_hash_map_with_capacity(self.cells.len() * 2);
        for (_, cell) in &self.cells {
            for i in 0..4 {
                *counts.entry(cell.sorted_facet_key(i)).or_insert(0) += 1;
            }
        }
        let mut bad: Vec<_> = counts.into_iter().filter(|&(_, n)| n != 2).collect();
        bad.sort_unstable();
        match bad.first() {
            Some(&(facet, count)) => {
                Err(TriangulationValidationError::NonManifoldFacet { facet, count })
            }
            None => Ok(()),
        }
    }

    /// Runs every structural check.
    ///
    /// # Errors
    ///
    /// Returns the first [`TriangulationValidationError`] encountered.
    pub fn is_valid(&self) -> Result<(), TriangulationValidationError> {
        for (ckey, cell) in &self.cells {
            let v = cell.vertices();
            if let Some(missing) = v.iter().find(|&&vk| !self.vertices.contains_key(vk)) {
                return Err(TriangulationValidationError::DanglingKey {
                    cell_key: ckey,
                    message: format!("vertex {missing:?} does not exist"),
                });
            }
            let distinct: FastHashSet<VertexKey> = v.iter().copied().collect();
            if distinct.len() != 4 {
                return Err(TriangulationValidationError::DuplicateVertexInCell { cell_key: ckey });
            }
        }

        for (vkey, vertex) in &self.vertices {
            if self.cells.is_empty() {
                break;
            }
            let ok = vertex
                .incident_cell()
                .and_then(|c| self.cells.get(c))
                .is_some_and(|c| c.contains_vertex(vkey));
            if !ok {
                return Err(TriangulationValidationError::InvalidIncidentCell {
                    vertex_key: vkey,
                    message: format!("{:?}", vertex.incident_cell()),
                });
            }
        }

        self.validate_neighbors()?;
        self.validate_facet_sharing()?;

        if !self.cells.is_empty() {
            let chi = self.compactified_euler_characteristic();
            if chi != 0 {
                return Err(TriangulationValidationError::EulerCharacteristic { found: chi });
            }
        }
        Ok(())
    }

    /// V − E + F − C over all simplices, the infinite vertex included.
    fn compactified_euler_characteristic(&self) -> isize {
        let mut edges: FastHashSet<EdgeKey> = FastHashSet::default();
        let mut facets: FastHashSet<[VertexKey; 3]> = FastHashSet::default();
        for (_, cell) in &self.cells {
            let v = cell.vertices();
            for i in 0..4 {
                facets.insert(cell.sorted_facet_key(i));
                for j in (i + 1)..4 {
                    edges.insert(EdgeKey::new(v[i], v[j]));
                }
            }
        }
        let to_isize = |n: usize| isize::try_from(n).unwrap_or(isize::MAX);
        to_isize(self.vertices.len()) - to_isize(edges.len()) + to_isize(facets.len())
            - to_isize(self.cells.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A single tetrahedron closed by four infinite cells.
    fn single_tetrahedron() -> (Tds, CellKey) {
        let mut tds = Tds::new();
        let v = [
            tds.insert_vertex(Point::new([0.0, 0.0, 0.0]), 0),
            tds.insert_vertex(Point::new([1.0, 0.0, 0.0]), 1),
            tds.insert_vertex(Point::new([0.0, 1.0, 0.0]), 2),
            tds.insert_vertex(Point::new([0.0, 0.0, 1.0]), 3),
        ];
        let inf = tds.infinite_vertex();
        let finite = tds.insert_cell(v);
        let mut all = vec![finite];
        for i in 0..4 {
            let mut verts = v;
            verts[i] = inf;
            let others: Vec<usize> = (0..4).filter(|&k| k != i).collect();
            verts.swap(others[0], others[1]);
            all.push(tds.insert_cell(verts));
        }
        tds.link_shared_facets(&all);
        (tds, finite)
    }

    #[test]
    fn closed_single_tetrahedron_is_valid() {
        let (tds, finite) = single_tetrahedron();
        assert!(tds.is_valid().is_ok());
        assert_eq!(tds.number_of_vertices(), 4);
        assert_eq!(tds.number_of_cells(), 5);
        assert_eq!(tds.number_of_finite_cells(), 1);
        assert!(!tds.is_infinite_cell(finite));
        assert_eq!(tds.finite_facets().len(), 4);
        assert_eq!(tds.hull_facets().len(), 4);
        assert_eq!(tds.finite_edges().len(), 6);
    }

    #[test]
    fn mirror_facets_round_trip() {
        let (tds, finite) = single_tetrahedron();
        for i in 0..4u8 {
            let facet = FacetHandle::new(finite, i);
            let mirror = tds.mirror_facet(facet).unwrap();
            assert!(tds.is_infinite_cell(mirror.cell()));
            assert_eq!(tds.mirror_facet(mirror), Some(facet));
            assert_eq!(tds.infinite_index(mirror.cell()), Some(mirror.index()));
        }
    }

    #[test]
    fn broken_links_are_reported() {
        let (mut tds, finite) = single_tetrahedron();
        tds.set_neighbor(finite, 0, None);
        assert!(matches!(
            tds.validate_neighbors(),
            Err(TriangulationValidationError::InvalidNeighbors { .. })
        ));
    }

    #[test]
    fn removing_a_cell_breaks_facet_sharing() {
        let (mut tds, finite) = single_tetrahedron();
        tds.remove_cell(finite);
        assert!(matches!(
            tds.validate_facet_sharing(),
            Err(TriangulationValidationError::NonManifoldFacet { count: 1, .. })
        ));
    }

    #[test]
    fn empty_structure_is_trivially_valid() {
        let tds = Tds::default();
        assert_eq!(tds.number_of_vertices(), 0);
        assert!(tds.is_valid().is_ok());
        assert!(tds.point(tds.infinite_vertex()).is_none());
    }
}
