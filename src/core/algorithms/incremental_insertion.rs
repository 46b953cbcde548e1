//! Incremental Delaunay insertion (Bowyer-Watson with an infinite vertex).
//!
//! Inserting a vertex `p` into a valid Delaunay triangulation:
//!
//! 1. Locate a cell in conflict with `p` (visibility walk, brute-force fallback)
//! 2. Flood-fill the conflict region
//! 3. Extract the cavity boundary facets
//! 4. Remove the conflict cells
//! 5. Fill the cavity: one new cell per boundary facet, with `p` replacing the
//!    vertex opposite that facet (which preserves the cell's orientation)
//! 6. Wire neighbors locally, across the old boundary and among the new cells
//!
//! Infinite cells take part in every step exactly like finite ones, so hull
//! growth needs no special case.

use crate::core::algorithms::locate::{
    ConflictError, LocateError, LocateResult, extract_cavity_boundary, find_conflict_region,
    find_conflicting_cell_brute_force, is_in_conflict, locate,
};
use crate::core::collections::CellKeyBuffer;
use crate::core::facet::FacetHandle;
use crate::core::triangulation_data_structure::{CellKey, Tds, VertexKey};
use crate::geometry::predicates::{Orientation, orientation};
use rand::Rng;

/// Error during incremental insertion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertionError {
    /// Conflict region finding failed.
    #[error("Conflict region error: {0}")]
    ConflictRegion(#[from] ConflictError),

    /// Point location failed.
    #[error("Location error: {0}")]
    Location(#[from] LocateError),

    /// The four initial vertices do not span a tetrahedron.
    #[error("Initial simplex is degenerate")]
    DegenerateInitialSimplex,

    /// Cavity filling failed.
    #[error("Cavity filling failed: {message}")]
    CavityFilling {
        /// Error message.
        message: String,
    },

    /// Neighbor wiring failed.
    #[error("Neighbor wiring failed: {message}")]
    NeighborWiring {
        /// Error message.
        message: String,
    },
}

/// Builds the first tetrahedron and the four infinite cells closing it.
///
/// The vertex order is swapped if needed so the finite cell is positively
/// oriented. Returns the key of the finite cell.
///
/// # Errors
///
/// Returns [`InsertionError::DegenerateInitialSimplex`] if the four points are coplanar.
pub fn create_initial_simplex(
    tds: &mut Tds,
    mut vertices: [VertexKey; 4],
) -> Result<CellKey, InsertionError> {
    let point = |v: VertexKey| {
        tds.point(v)
            .copied()
            .ok_or_else(|| InsertionError::CavityFilling {
                message: format!("initial vertex {v:?} is not a finite vertex"),
            })
    };
    let [a, b, c, d] = [
        point(vertices[0])?,
        point(vertices[1])?,
        point(vertices[2])?,
        point(vertices[3])?,
    ];
    match orientation(&a, &b, &c, &d) {
        Orientation::POSITIVE => {}
        Orientation::NEGATIVE => vertices.swap(2, 3),
        Orientation::DEGENERATE => return Err(InsertionError::DegenerateInitialSimplex),
    }

    let infinite = tds.infinite_vertex();
    let finite = tds.insert_cell(vertices);
    let mut created = vec![finite];
    for i in 0..4 {
        // Replace vertex i and swap the next two so the infinite cell induces
        // the opposite orientation on the shared facet.
        let mut cell = vertices;
        cell[i] = infinite;
        cell.swap((i + 1) % 4, (i + 2) % 4);
        created.push(tds.insert_cell(cell));
    }
    tds.link_shared_facets(&created);
    Ok(finite)
}

/// Inserts the finite vertex `vkey` (already in the arena, not yet in any cell).
///
/// `hint` is the cell to start the walk from; the returned key is a new cell
/// incident to `vkey`, suitable as the hint for the next insertion.
///
/// # Errors
///
/// Returns an [`InsertionError`] if no conflict region can be found or the
/// cavity cannot be retriangulated. On error the structure may be partially
/// modified and must be discarded.
pub fn insert_vertex<R: Rng + ?Sized>(
    tds: &mut Tds,
    vkey: VertexKey,
    hint: Option<CellKey>,
    rng: &mut R,
) -> Result<CellKey, InsertionError> {
    let point = *tds
        .point(vkey)
        .ok_or_else(|| InsertionError::CavityFilling {
            message: format!("vertex {vkey:?} is not a finite vertex"),
        })?;

    let start = match locate(tds, &point, hint, rng) {
        Ok(LocateResult::InsideCell(c) | LocateResult::Outside(c))
            if is_in_conflict(tds, c, &point)? =>
        {
            c
        }
        Ok(result) => {
            tracing::debug!(
                cell = ?result.cell(),
                "walk ended outside the conflict region; scanning all cells"
            );
            find_conflicting_cell_brute_force(tds, &point)?
        }
        Err(LocateError::CycleDetected { steps }) => {
            tracing::warn!(steps, "visibility walk did not terminate; scanning all cells");
            find_conflicting_cell_brute_force(tds, &point)?
        }
        Err(e) => return Err(e.into()),
    };

    let conflict_cells = find_conflict_region(tds, start, &point)?;
    let boundary = extract_cavity_boundary(tds, &conflict_cells)?;
    tracing::trace!(
        conflict = conflict_cells.len(),
        boundary = boundary.len(),
        "cavity extracted"
    );

    let new_cells = fill_cavity(tds, vkey, &conflict_cells, &boundary)?;
    new_cells.first().copied().ok_or_else(|| InsertionError::CavityFilling {
        message: "cavity produced no cells".to_owned(),
    })
}

/// One boundary facet of the cavity, captured before the conflict cells are removed.
struct CavityFacet {
    vertices: [VertexKey; 4],
    apex_index: usize,
    outside: CellKey,
    outside_index: usize,
}

/// Replaces `conflict_cells` with the star of `vkey` over `boundary`.
///
/// # Errors
///
/// - [`InsertionError::CavityFilling`] if a new finite cell would not be
///   positively oriented (the cavity is not star-shaped from the new point).
/// - [`InsertionError::NeighborWiring`] if a new cell is left without a neighbor.
pub fn fill_cavity(
    tds: &mut Tds,
    vkey: VertexKey,
    conflict_cells: &[CellKey],
    boundary: &[FacetHandle],
) -> Result<CellKeyBuffer, InsertionError> {
    let mut facets = Vec::with_capacity(boundary.len());
    for facet in boundary {
        let cell = tds
            .cell(facet.cell())
            .ok_or_else(|| InsertionError::CavityFilling {
                message: format!("boundary cell {:?} not found", facet.cell()),
            })?;
        let i = facet.index();
        let outside = cell.neighbor(i).ok_or_else(|| InsertionError::NeighborWiring {
            message: format!("boundary facet {facet:?} has no outer neighbor"),
        })?;
        let outside_index = tds.mirror_index(facet.cell(), i).ok_or_else(|| {
            InsertionError::NeighborWiring {
                message: format!("outer neighbor of {facet:?} does not link back"),
            }
        })?;
        let vertices = cell.vertices_with(i, vkey);
        ensure_positive(tds, &vertices)?;
        facets.push(CavityFacet {
            vertices,
            apex_index: i,
            outside,
            outside_index,
        });
    }

    for &ckey in conflict_cells {
        tds.remove_cell(ckey);
    }

    let mut new_cells = CellKeyBuffer::new();
    for facet in &facets {
        let ckey = tds.insert_cell(facet.vertices);
        tds.set_neighbor(ckey, facet.apex_index, Some(facet.outside));
        tds.set_neighbor(facet.outside, facet.outside_index, Some(ckey));
        new_cells.push(ckey);
    }

    wire_cavity_neighbors(tds, &new_cells)?;
    Ok(new_cells)
}

/// Links the new cells among themselves and checks none is left open.
fn wire_cavity_neighbors(tds: &mut Tds, new_cells: &[CellKey]) -> Result<(), InsertionError> {
    tds.link_shared_facets(new_cells);
    for &ckey in new_cells {
        let complete = tds
            .cell(ckey)
            .is_some_and(|c| c.neighbors().iter().all(Option::is_some));
        if !complete {
            return Err(InsertionError::NeighborWiring {
                message: format!("new cell {ckey:?} has an unmatched facet"),
            });
        }
    }
    Ok(())
}

/// Rejects a new finite cell that would be flat or inverted.
fn ensure_positive(tds: &Tds, vertices: &[VertexKey; 4]) -> Result<(), InsertionError> {
    if vertices.iter().any(|&v| tds.is_infinite_vertex(v)) {
        return Ok(());
    }
    let p: Vec<_> = vertices.iter().filter_map(|&v| tds.point(v)).collect();
    if p.len() != 4 {
        return Err(InsertionError::CavityFilling {
            message: format!("cell {vertices:?} references unknown vertices"),
        });
    }
    match orientation(p[0], p[1], p[2], p[3]) {
        Orientation::POSITIVE => Ok(()),
        o => Err(InsertionError::CavityFilling {
            message: format!("new cell would have orientation {o}"),
        }),
    }
}
