//! Tetrahedral cells of the triangulation arena.
//!
//! A [`Cell`] is an ordered 4-tuple of vertex keys plus one neighbor slot per
//! vertex: `neighbors[i]` is the cell across the facet opposite `vertices[i]`.
//! Finite cells are always stored positively oriented (see
//! [`orientation`](crate::geometry::predicates::orientation)); infinite cells are
//! stored so that replacing the infinite vertex with a point beyond their hull
//! facet yields a positively oriented tetrahedron.

use super::triangulation_data_structure::{CellKey, VertexKey};

/// A tetrahedron with adjacency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    vertices: [VertexKey; 4],
    pub(crate) neighbors: [Option<CellKey>; 4],
}

impl Cell {
    /// Creates an unlinked cell.
    #[must_use]
    pub const fn new(vertices: [VertexKey; 4]) -> Self {
        Self {
            vertices,
            neighbors: [None; 4],
        }
    }

    /// The four vertex keys, in orientation order.
    #[must_use]
    #[inline]
    pub const fn vertices(&self) -> &[VertexKey; 4] {
        &self.vertices
    }

    /// The neighbor across the facet opposite each vertex.
    #[must_use]
    #[inline]
    pub const fn neighbors(&self) -> &[Option<CellKey>; 4] {
        &self.neighbors
    }

    /// The neighbor opposite vertex `i`.
    #[must_use]
    #[inline]
    pub fn neighbor(&self, i: usize) -> Option<CellKey> {
        self.neighbors.get(i).copied().flatten()
    }

    /// Position of `vkey` within this cell, if present.
    #[must_use]
    pub fn index_of(&self, vkey: VertexKey) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vkey)
    }

    /// Returns `true` if the cell contains `vkey`.
    #[must_use]
    pub fn contains_vertex(&self, vkey: VertexKey) -> bool {
        self.index_of(vkey).is_some()
    }

    /// Position of the neighbor slot pointing at `ckey`, if any.
    #[must_use]
    pub fn neighbor_index(&self, ckey: CellKey) -> Option<usize> {
        self.neighbors.iter().position(|&n| n == Some(ckey))
    }

    /// The vertex keys of facet `i`, sorted. Two cells sharing a facet produce
    /// the same key regardless of their local vertex order.
    #[must_use]
    pub fn sorted_facet_key(&self, i: usize) -> [VertexKey; 3] {
        let mut key = [VertexKey::default(); 3];
        let mut k = 0;
        for (j, &v) in self.vertices.iter().enumerate() {
            if j != i && k < 3 {
                key[k] = v;
                k += 1;
            }
        }
        key.sort_unstable();
        key
    }

    /// Returns a copy of the vertex array with position `i` replaced by `vkey`.
    #[must_use]
    pub fn vertices_with(&self, i: usize, vkey: VertexKey) -> [VertexKey; 4] {
        let mut vertices = self.vertices;
        vertices[i] = vkey;
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn keys() -> [VertexKey; 5] {
        let mut sm: SlotMap<VertexKey, ()> = SlotMap::with_key();
        [
            sm.insert(()),
            sm.insert(()),
            sm.insert(()),
            sm.insert(()),
            sm.insert(()),
        ]
    }

    #[test]
    fn facet_keys_match_across_vertex_orders() {
        let [a, b, c, d, e] = keys();
        let first = Cell::new([a, b, c, d]);
        let second = Cell::new([e, d, c, b]);
        assert_eq!(first.sorted_facet_key(0), second.sorted_facet_key(0));
        assert_ne!(first.sorted_facet_key(1), second.sorted_facet_key(0));
    }

    #[test]
    fn vertex_lookup_and_replacement() {
        let [a, b, c, d, e] = keys();
        let cell = Cell::new([a, b, c, d]);
        assert_eq!(cell.index_of(c), Some(2));
        assert!(!cell.contains_vertex(e));
        assert_eq!(cell.vertices_with(1, e), [a, e, c, d]);
        assert_eq!(cell.neighbor(0), None);
        assert_eq!(cell.neighbor(9), None);
    }
}
