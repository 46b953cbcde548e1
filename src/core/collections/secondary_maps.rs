use crate::core::triangulation_data_structure::{CellKey, VertexKey};
use slotmap::{SecondaryMap, SparseSecondaryMap};

/// Sparse secondary map for per-cell data touched by a single algorithm run.
///
/// Conflict-region search uses it to mark visited cells: only the cells near
/// the inserted point ever get an entry.
pub type CellSecondaryMap<V> = SparseSecondaryMap<CellKey, V>;

/// Dense secondary map for per-cell data covering (almost) every cell.
///
/// The alpha complex stores one record per finite cell, so a dense map indexed
/// directly by the slot is the better fit there.
pub type DenseCellMap<V> = SecondaryMap<CellKey, V>;

/// Dense secondary map for per-vertex data covering every vertex.
pub type DenseVertexMap<V> = SecondaryMap<VertexKey, V>;
