//! Facet and edge handles.
//!
//! A facet is addressed as `(cell, i)`: the triangle of `cell` opposite its
//! `i`-th vertex. The same geometric triangle has two handles, one from each
//! incident cell. Edges are addressed by their two endpoints, sorted, so edge
//! identity does not depend on which incident cell reports it.

use super::collections::FacetIndex;
use super::triangulation_data_structure::{CellKey, VertexKey};

/// Local vertex indices of facet `i` of a positively oriented tetrahedron,
/// ordered so that the facet normal (right-hand rule) points out of the cell.
pub const OUTWARD_FACET_VERTICES: [[usize; 3]; 4] = [[1, 2, 3], [0, 3, 2], [0, 1, 3], [0, 2, 1]];

/// A facet given by a cell and the index of the vertex opposite it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FacetHandle {
    cell: CellKey,
    facet_index: FacetIndex,
}

impl FacetHandle {
    /// Creates a handle. `facet_index` must be in `0..4`.
    #[must_use]
    pub const fn new(cell: CellKey, facet_index: FacetIndex) -> Self {
        Self { cell, facet_index }
    }

    /// The cell the handle is taken from.
    #[must_use]
    #[inline]
    pub const fn cell(&self) -> CellKey {
        self.cell
    }

    /// Index of the opposite vertex within [`Self::cell`].
    #[must_use]
    #[inline]
    pub const fn facet_index(&self) -> FacetIndex {
        self.facet_index
    }

    /// [`Self::facet_index`] as a `usize`.
    #[must_use]
    #[inline]
    pub fn index(&self) -> usize {
        usize::from(self.facet_index)
    }
}

/// A canonical edge: two vertex keys in ascending order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    v0: VertexKey,
    v1: VertexKey,
}

impl EdgeKey {
    /// Creates the canonical key for the edge between `a` and `b`.
    #[must_use]
    pub fn new(a: VertexKey, b: VertexKey) -> Self {
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// Both endpoints, smallest first.
    #[must_use]
    #[inline]
    pub const fn endpoints(&self) -> (VertexKey, VertexKey) {
        (self.v0, self.v1)
    }
}
