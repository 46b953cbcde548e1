//! Point location and conflict-region search.
//!
//! [`locate`] is a randomized visibility walk: starting from a hint cell it
//! repeatedly crosses a facet whose supporting plane separates the cell from
//! the query point, choosing the first facet to test at random so the walk
//! cannot cycle forever. It stops in the finite cell containing the point, or
//! in the infinite cell whose hull facet the point sees.
//!
//! [`find_conflict_region`] then flood-fills from that cell through shared
//! facets, collecting every cell whose circumsphere strictly contains the
//! point, and [`extract_cavity_boundary`] lists the facets separating the
//! region from the rest of the mesh.
//!
//! # Tie-breaks
//!
//! - A point exactly on a circumsphere is *not* in conflict.
//! - A degenerate orientation never triggers a walk step.
//! - An infinite cell whose hull facet is coplanar with the point is in
//!   conflict exactly when the finite cell across that facet is.
//!
//! # References
//!
//! - O. Devillers, S. Pion, and M. Teillaud, "Walking in a Triangulation",
//!   International Journal of Foundations of Computer Science, 2001.

use crate::core::collections::{CavityBoundaryBuffer, CellKeyBuffer, CellSecondaryMap};
use crate::core::facet::FacetHandle;
use crate::core::triangulation_data_structure::{CellKey, Tds};
use crate::geometry::point::Point;
use crate::geometry::predicates::{InSphere, Orientation, in_sphere, orientation};
use rand::Rng;

/// Result of a point-location query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    /// The point lies in the closed finite cell.
    InsideCell(CellKey),
    /// The point lies outside the convex hull; the infinite cell's hull facet is visible from it.
    Outside(CellKey),
}

impl LocateResult {
    /// The cell the walk ended in.
    #[must_use]
    pub const fn cell(self) -> CellKey {
        match self {
            Self::InsideCell(c) | Self::Outside(c) => c,
        }
    }
}

/// Error during point location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// Triangulation has no cells.
    #[error("Cannot locate in empty triangulation")]
    EmptyTriangulation,

    /// Cell reference is invalid.
    #[error("Invalid cell reference: {cell_key:?}")]
    InvalidCell {
        /// The invalid cell key.
        cell_key: CellKey,
    },

    /// The walk did not terminate within its step budget.
    #[error("Walk did not terminate after {steps} steps")]
    CycleDetected {
        /// Number of steps taken.
        steps: usize,
    },
}

/// Error during conflict-region search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    /// A cell key did not resolve, or a finite cell referenced the infinite vertex.
    #[error("Invalid cell {cell_key:?}: {message}")]
    InvalidCell {
        /// The cell key that failed.
        cell_key: CellKey,
        /// Error message.
        message: String,
    },

    /// The flood fill was started from a cell that is not in conflict.
    #[error("Starting cell {cell_key:?} is not in conflict with the point")]
    StartNotInConflict {
        /// The starting cell.
        cell_key: CellKey,
    },

    /// No cell of the triangulation conflicts with the point.
    #[error("No cell conflicts with the point")]
    NoConflictingCell,
}

// =============================================================================
// PREDICATE HELPERS
// =============================================================================

/// The cell's four positions with vertex `i` replaced by `point`.
///
/// Returns `None` if any of the remaining three vertices is infinite.
fn points_with_replacement(tds: &Tds, ckey: CellKey, i: usize, point: &Point) -> Option<[Point; 4]> {
    let cell = tds.cell(ckey)?;
    let mut out = [*point; 4];
    for (j, &v) in cell.vertices().iter().enumerate() {
        if j != i {
            out[j] = *tds.point(v)?;
        }
    }
    Some(out)
}

fn invalid_cell(ckey: CellKey, message: &str) -> ConflictError {
    ConflictError::InvalidCell {
        cell_key: ckey,
        message: message.to_owned(),
    }
}

/// Orientation of the tetrahedron obtained by replacing vertex `i` of `ckey` with `point`.
///
/// Negative means `point` lies strictly beyond facet `i`.
fn facet_orientation(tds: &Tds, ckey: CellKey, i: usize, point: &Point) -> Option<Orientation> {
    let [a, b, c, d] = points_with_replacement(tds, ckey, i, point)?;
    Some(orientation(&a, &b, &c, &d))
}

/// In-sphere test against a finite cell.
fn finite_in_sphere(tds: &Tds, ckey: CellKey, point: &Point) -> Result<InSphere, ConflictError> {
    let [a, b, c, d] = tds
        .cell_points(ckey)
        .ok_or_else(|| invalid_cell(ckey, "expected a finite cell"))?;
    Ok(in_sphere(&a, &b, &c, &d, point))
}

/// Returns `true` if `ckey` is in conflict with `point`.
///
/// Finite cells conflict when the point is strictly inside their circumsphere.
/// Infinite cells conflict when the point lies strictly beyond their hull facet,
/// or on its plane while the finite cell across it conflicts.
///
/// # Errors
///
/// Returns [`ConflictError::InvalidCell`] if the cell or its hull neighbor cannot be resolved.
pub fn is_in_conflict(tds: &Tds, ckey: CellKey, point: &Point) -> Result<bool, ConflictError> {
    let cell = tds
        .cell(ckey)
        .ok_or_else(|| invalid_cell(ckey, "cell not found"))?;
    let Some(k) = tds.infinite_index(ckey) else {
        return Ok(finite_in_sphere(tds, ckey, point)? == InSphere::INSIDE);
    };
    match facet_orientation(tds, ckey, k, point) {
        Some(Orientation::POSITIVE) => Ok(true),
        Some(Orientation::NEGATIVE) => Ok(false),
        Some(Orientation::DEGENERATE) => {
            let finite = cell
                .neighbor(k)
                .ok_or_else(|| invalid_cell(ckey, "hull facet has no finite neighbor"))?;
            Ok(finite_in_sphere(tds, finite, point)? == InSphere::INSIDE)
        }
        None => Err(invalid_cell(ckey, "infinite cell with more than one infinite vertex")),
    }
}

// =============================================================================
// LOCATE
// =============================================================================

/// Locates `point` with a randomized visibility walk.
///
/// The walk starts at `hint` when it is a live cell (an infinite hint is
/// replaced by its finite neighbor) and gives up after a step budget
/// proportional to the number of cells.
///
/// # Errors
///
/// - [`LocateError::EmptyTriangulation`] if there are no cells.
/// - [`LocateError::InvalidCell`] if a traversed cell cannot be resolved.
/// - [`LocateError::CycleDetected`] if the step budget runs out.
pub fn locate<R: Rng + ?Sized>(
    tds: &Tds,
    point: &Point,
    hint: Option<CellKey>,
    rng: &mut R,
) -> Result<LocateResult, LocateError> {
    let start = match hint {
        Some(key) if tds.contains_cell(key) => key,
        _ => tds
            .cells()
            .next()
            .map(|(key, _)| key)
            .ok_or(LocateError::EmptyTriangulation)?,
    };

    let mut current = match tds.infinite_index(start) {
        Some(k) => tds
            .cell(start)
            .and_then(|c| c.neighbor(k))
            .ok_or(LocateError::InvalidCell { cell_key: start })?,
        None => start,
    };

    let max_steps = 4 * tds.number_of_cells() + 64;
    'walk: for _ in 0..max_steps {
        let cell = tds
            .cell(current)
            .ok_or(LocateError::InvalidCell { cell_key: current })?;
        let offset = rng.random_range(0..4usize);
        for k in 0..4 {
            let i = (offset + k) % 4;
            let o = facet_orientation(tds, current, i, point)
                .ok_or(LocateError::InvalidCell { cell_key: current })?;
            if o != Orientation::NEGATIVE {
                continue;
            }
            let next = cell
                .neighbor(i)
                .ok_or(LocateError::InvalidCell { cell_key: current })?;
            if tds.is_infinite_cell(next) {
                return Ok(LocateResult::Outside(next));
            }
            current = next;
            continue 'walk;
        }
        return Ok(LocateResult::InsideCell(current));
    }

    Err(LocateError::CycleDetected { steps: max_steps })
}

/// Scans every cell for one in conflict with `point`.
///
/// Used when the walk fails to terminate.
///
/// # Errors
///
/// Returns [`ConflictError::NoConflictingCell`] if no cell conflicts.
pub fn find_conflicting_cell_brute_force(tds: &Tds, point: &Point) -> Result<CellKey, ConflictError> {
    for (ckey, _) in tds.cells() {
        if is_in_conflict(tds, ckey, point)? {
            return Ok(ckey);
        }
    }
    Err(ConflictError::NoConflictingCell)
}

// =============================================================================
// CONFLICT REGION
// =============================================================================

/// Collects every cell in conflict with `point`, flood-filling from `start`.
///
/// The conflict region of a Delaunay triangulation is connected, so a
/// breadth-first search through shared facets finds all of it.
///
/// # Errors
///
/// - [`ConflictError::StartNotInConflict`] if `start` does not conflict.
/// - [`ConflictError::InvalidCell`] if the adjacency is broken.
pub fn find_conflict_region(
    tds: &Tds,
    start: CellKey,
    point: &Point,
) -> Result<CellKeyBuffer, ConflictError> {
    if !is_in_conflict(tds, start, point)? {
        return Err(ConflictError::StartNotInConflict { cell_key: start });
    }

    let mut visited: CellSecondaryMap<bool> = CellSecondaryMap::new();
    let mut conflict = CellKeyBuffer::new();
    let mut queue = CellKeyBuffer::new();
    visited.insert(start, true);
    queue.push(start);

    while let Some(ckey) = queue.pop() {
        conflict.push(ckey);
        let cell = tds
            .cell(ckey)
            .ok_or_else(|| invalid_cell(ckey, "cell vanished during search"))?;
        for i in 0..4 {
            let neighbor = cell
                .neighbor(i)
                .ok_or_else(|| invalid_cell(ckey, "missing neighbor"))?;
            if visited.contains_key(neighbor) {
                continue;
            }
            let hit = is_in_conflict(tds, neighbor, point)?;
            visited.insert(neighbor, hit);
            if hit {
                queue.push(neighbor);
            }
        }
    }

    Ok(conflict)
}

/// Facets of the conflict region whose other side is not in conflict.
///
/// Each handle is taken from the conflict cell, so its opposite vertex is the
/// one the new point replaces.
///
/// # Errors
///
/// Returns [`ConflictError::InvalidCell`] if the adjacency is broken.
pub fn extract_cavity_boundary(
    tds: &Tds,
    conflict_cells: &[CellKey],
) -> Result<CavityBoundaryBuffer, ConflictError> {
    let mut in_region: CellSecondaryMap<()> = CellSecondaryMap::new();
    for &ckey in conflict_cells {
        in_region.insert(ckey, ());
    }

    let mut boundary = CavityBoundaryBuffer::new();
    for &ckey in conflict_cells {
        let cell = tds
            .cell(ckey)
            .ok_or_else(|| invalid_cell(ckey, "conflict cell not found"))?;
        for i in 0..4u8 {
            let neighbor = cell
                .neighbor(usize::from(i))
                .ok_or_else(|| invalid_cell(ckey, "missing neighbor"))?;
            if !in_region.contains_key(neighbor) {
                boundary.push(FacetHandle::new(ckey, i));
            }
        }
    }
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::incremental_insertion::create_initial_simplex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn unit_simplex() -> Tds {
        let mut tds = Tds::new();
        let v = [
            tds.insert_vertex(Point::new([0.0, 0.0, 0.0]), 0),
            tds.insert_vertex(Point::new([1.0, 0.0, 0.0]), 1),
            tds.insert_vertex(Point::new([0.0, 1.0, 0.0]), 2),
            tds.insert_vertex(Point::new([0.0, 0.0, 1.0]), 3),
        ];
        create_initial_simplex(&mut tds, v).unwrap();
        tds
    }

    #[test]
    fn locate_inside_and_outside() {
        let tds = unit_simplex();
        let mut rng = StdRng::seed_from_u64(7);

        let inside = locate(&tds, &Point::new([0.1, 0.1, 0.1]), None, &mut rng).unwrap();
        assert!(matches!(inside, LocateResult::InsideCell(c) if !tds.is_infinite_cell(c)));

        let outside = locate(&tds, &Point::new([2.0, 2.0, 2.0]), None, &mut rng).unwrap();
        assert!(matches!(outside, LocateResult::Outside(c) if tds.is_infinite_cell(c)));
    }

    #[test]
    fn locate_on_empty_structure_fails() {
        let tds = Tds::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            locate(&tds, &Point::origin(), None, &mut rng),
            Err(LocateError::EmptyTriangulation)
        );
    }

    #[test]
    fn interior_point_conflicts_with_the_finite_cell_only() {
        let tds = unit_simplex();
        let p = Point::new([0.2, 0.2, 0.2]);
        let (finite, _) = tds.finite_cells().next().unwrap();
        let region = find_conflict_region(&tds, finite, &p).unwrap();
        assert_eq!(region.len(), 1);
        let boundary = extract_cavity_boundary(&tds, &region).unwrap();
        assert_eq!(boundary.len(), 4);
    }

    #[test]
    fn exterior_point_sees_one_hull_facet() {
        let tds = unit_simplex();
        // Beyond the facet x + y + z = 1 only, but inside the circumsphere.
        let p = Point::new([0.4, 0.4, 0.4]);
        let hit = find_conflicting_cell_brute_force(&tds, &p).unwrap();
        let region = find_conflict_region(&tds, hit, &p).unwrap();
        let infinite = region.iter().filter(|&&c| tds.is_infinite_cell(c)).count();
        assert_eq!(region.len(), 2);
        assert_eq!(infinite, 1);
    }

    #[test]
    fn cospherical_point_is_not_in_conflict() {
        let tds = unit_simplex();
        // (1, 1, 1) lies on the circumsphere of the unit simplex.
        let p = Point::new([1.0, 1.0, 1.0]);
        let (finite, _) = tds.finite_cells().next().unwrap();
        assert!(!is_in_conflict(&tds, finite, &p).unwrap());
    }

    #[test]
    fn coplanar_hull_point_follows_the_finite_neighbor() {
        let tds = unit_simplex();
        let (finite, _) = tds.finite_cells().next().unwrap();
        let below = tds
            .hull_facets()
            .into_iter()
            .find(|f| f.index() == 3)
            .and_then(|f| tds.mirror_facet(f))
            .unwrap();
        // In the plane z = 0, inside the circumcircle of the bottom facet.
        let inside = Point::new([0.5, 0.5, 0.0]);
        assert!(is_in_conflict(&tds, below.cell(), &inside).unwrap());
        assert!(is_in_conflict(&tds, finite, &inside).unwrap());
        // In the plane z = 0, far outside the circumcircle.
        let outside = Point::new([5.0, 5.0, 0.0]);
        assert!(!is_in_conflict(&tds, below.cell(), &outside).unwrap());
    }
}
