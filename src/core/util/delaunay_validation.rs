//! Delaunay empty-circumsphere property validation utilities.

use crate::core::triangulation_data_structure::{
    CellKey, Tds, TriangulationValidationError, VertexKey,
};
use crate::geometry::predicates::{InSphere, Orientation, in_sphere, orientation};
use thiserror::Error;

/// Errors that can occur during Delaunay property validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DelaunayValidationError {
    /// A cell violates the Delaunay property (has an external vertex inside its circumsphere).
    #[error("Cell {cell_key:?} violates the Delaunay property: vertex {vertex_key:?} is inside its circumsphere")]
    DelaunayViolation {
        /// The key of the cell that violates the Delaunay property.
        cell_key: CellKey,
        /// A vertex strictly inside the circumsphere.
        vertex_key: VertexKey,
    },
    /// A finite cell is flat or inverted.
    #[error("Cell {cell_key:?} has orientation {orientation} (expected POSITIVE)")]
    BadOrientation {
        /// The offending cell.
        cell_key: CellKey,
        /// Its orientation.
        orientation: Orientation,
    },
    /// Structural corruption detected during validation.
    #[error("TDS corruption: {source}")]
    TriangulationState {
        /// The underlying structural error.
        #[from]
        source: TriangulationValidationError,
    },
}

/// Checks one finite cell against every finite vertex.
fn validate_cell_delaunay(tds: &Tds, cell_key: CellKey) -> Result<(), DelaunayValidationError> {
    let (Some(cell), Some([a, b, c, d])) = (tds.cell(cell_key), tds.cell_points(cell_key)) else {
        return Ok(());
    };

    let o = orientation(&a, &b, &c, &d);
    if o != Orientation::POSITIVE {
        return Err(DelaunayValidationError::BadOrientation {
            cell_key,
            orientation: o,
        });
    }

    for (vertex_key, vertex) in tds.finite_vertices() {
        if cell.contains_vertex(vertex_key) {
            continue;
        }
        if in_sphere(&a, &b, &c, &d, vertex.point()) == InSphere::INSIDE {
            return Err(DelaunayValidationError::DelaunayViolation {
                cell_key,
                vertex_key,
            });
        }
    }
    Ok(())
}

/// Brute-force check that no finite vertex lies strictly inside any finite
/// cell's circumsphere, and that every finite cell is positively oriented.
///
/// O(cells × vertices); intended for tests and debugging.
///
/// # Errors
///
/// Returns the first violation found.
pub fn is_delaunay(tds: &Tds) -> Result<(), DelaunayValidationError> {
    for (cell_key, _) in tds.finite_cells() {
        validate_cell_delaunay(tds, cell_key)?;
    }
    Ok(())
}

/// Finds every finite cell violating the empty-circumsphere property.
#[must_use]
pub fn find_delaunay_violations(tds: &Tds) -> Vec<CellKey> {
    let violations: Vec<CellKey> = tds
        .finite_cells()
        .filter(|&(cell_key, _)| validate_cell_delaunay(tds, cell_key).is_err())
        .map(|(cell_key, _)| cell_key)
        .collect();
    if !violations.is_empty() {
        tracing::debug!(count = violations.len(), "Delaunay violations found");
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::incremental_insertion::create_initial_simplex;
    use crate::geometry::point::Point;

    #[test]
    fn single_simplex_is_delaunay() {
        let mut tds = Tds::new();
        let v = [
            tds.insert_vertex(Point::new([0.0, 0.0, 0.0]), 0),
            tds.insert_vertex(Point::new([1.0, 0.0, 0.0]), 1),
            tds.insert_vertex(Point::new([0.0, 1.0, 0.0]), 2),
            tds.insert_vertex(Point::new([0.0, 0.0, 1.0]), 3),
        ];
        create_initial_simplex(&mut tds, v).unwrap();
        assert!(is_delaunay(&tds).is_ok());
        assert!(find_delaunay_violations(&tds).is_empty());
    }

    #[test]
    fn stray_vertex_inside_circumsphere_is_reported() {
        let mut tds = Tds::new();
        let v = [
            tds.insert_vertex(Point::new([0.0, 0.0, 0.0]), 0),
            tds.insert_vertex(Point::new([1.0, 0.0, 0.0]), 1),
            tds.insert_vertex(Point::new([0.0, 1.0, 0.0]), 2),
            tds.insert_vertex(Point::new([0.0, 0.0, 1.0]), 3),
        ];
        create_initial_simplex(&mut tds, v).unwrap();
        // Present in the arena but never inserted into the mesh.
        let stray = tds.insert_vertex(Point::new([0.2, 0.2, 0.2]), 4);
        match is_delaunay(&tds) {
            Err(DelaunayValidationError::DelaunayViolation { vertex_key, .. }) => {
                assert_eq!(vertex_key, stray);
            }
            other => panic!("expected a violation, got {other:?}"),
        }
        assert_eq!(find_delaunay_violations(&tds).len(), 1);
    }
}
