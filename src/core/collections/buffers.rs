use crate::core::facet::FacetHandle;
use crate::core::triangulation_data_structure::{CellKey, VertexKey};

use super::SmallBuffer;

/// Inline capacity for per-insertion cell lists.
///
/// A well-distributed insertion typically replaces a handful of cells and
/// creates a few dozen; larger cavities spill to the heap.
pub const CAVITY_BUFFER_SIZE: usize = 32;

/// Inline capacity for cavity boundary facets.
pub const CAVITY_BOUNDARY_BUFFER_SIZE: usize = 64;

/// Cell keys collected during insertion (conflict region, new cells, BFS queue).
///
/// # Examples
///
/// ```rust
/// use delaunay_alpha::core::collections::CellKeyBuffer;
///
/// let cells: CellKeyBuffer = CellKeyBuffer::new();
/// assert!(cells.is_empty());
/// ```
pub type CellKeyBuffer = SmallBuffer<CellKey, CAVITY_BUFFER_SIZE>;

/// Facets on the boundary of an insertion cavity.
pub type CavityBoundaryBuffer = SmallBuffer<FacetHandle, CAVITY_BOUNDARY_BUFFER_SIZE>;

/// The three vertex keys of a facet.
pub type FacetVertexBuffer = SmallBuffer<VertexKey, 3>;
