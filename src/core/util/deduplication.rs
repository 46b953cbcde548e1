//! Coincident-point detection.

use crate::core::collections::{FastHashMap, SmallBuffer, fast_hash_map_with_capacity};
use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};

/// An input point dropped because it coincides with an earlier one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergedDuplicate {
    /// Index of the dropped point.
    pub index: usize,
    /// Index of the earlier point it was merged into.
    pub kept: usize,
}

/// Finds the points lying within `epsilon` (Euclidean, inclusive) of an earlier point.
///
/// Points are scanned in input order and the first occurrence of each
/// cluster wins, so the result is deterministic and independent of any later
/// shuffling. A point within range of several kept points maps to the lowest
/// kept index. A point is compared only against points that were kept, which
/// means chains `a ~ b ~ c` with `a` and `c` farther apart than `epsilon` keep
/// both `a` and `c`.
///
/// An `epsilon` of zero (or a negative one) matches exact coordinates only.
///
/// # Complexity
///
/// Expected O(n): kept points are bucketed in a uniform grid of cell size
/// `epsilon` and each query inspects the 27 surrounding buckets.
///
/// # Examples
///
/// ```
/// use delaunay_alpha::core::util::find_duplicate_points;
/// use delaunay_alpha::geometry::point::Point;
///
/// let points = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([1e-12, 0.0, 0.0]),
/// ];
/// let merged = find_duplicate_points(&points, 1e-10);
/// assert_eq!(merged.len(), 1);
/// assert_eq!((merged[0].index, merged[0].kept), (2, 0));
/// ```
#[must_use]
pub fn find_duplicate_points(points: &[Point], epsilon: f64) -> Vec<MergedDuplicate> {
    if epsilon > 0.0 && epsilon.is_finite() {
        find_within_epsilon(points, epsilon)
    } else {
        find_exact(points)
    }
}

fn find_exact(points: &[Point]) -> Vec<MergedDuplicate> {
    let mut first_seen: FastHashMap<Point, usize> = fast_hash_map_with_capacity(points.len());
    let mut merged = Vec::new();
    for (index, &p) in points.iter().enumerate() {
        // +0.0 and -0.0 hash differently but compare equal; normalize.
        let key = Point::new(p.coords().map(|c| if c == 0.0 { 0.0 } else { c }));
        match first_seen.get(&key) {
            Some(&kept) => merged.push(MergedDuplicate { index, kept }),
            None => {
                first_seen.insert(key, index);
            }
        }
    }
    merged
}

type GridKey = [i64; 3];

#[allow(clippy::cast_possible_truncation)]
fn grid_key(p: &Point, epsilon: f64) -> GridKey {
    // `as` saturates for out-of-range values, which only merges far buckets.
    p.coords().map(|c| (c / epsilon).floor() as i64)
}

fn find_within_epsilon(points: &[Point], epsilon: f64) -> Vec<MergedDuplicate> {
    let eps2 = epsilon * epsilon;
    let mut grid: FastHashMap<GridKey, SmallBuffer<usize, 2>> =
        fast_hash_map_with_capacity(points.len());
    let mut merged = Vec::new();

    for (index, p) in points.iter().enumerate() {
        let key = grid_key(p, epsilon);
        let mut kept: Option<usize> = None;
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    let neighbor = [
                        key[0].saturating_add(dx),
                        key[1].saturating_add(dy),
                        key[2].saturating_add(dz),
                    ];
                    let Some(bucket) = grid.get(&neighbor) else {
                        continue;
                    };
                    let hit = bucket
                        .iter()
                        .copied()
                        .filter(|&k| p.distance_squared(&points[k]) <= eps2)
                        .min();
                    kept = match (kept, hit) {
                        (Some(a), Some(b)) => Some(a.min(b)),
                        (a, b) => a.or(b),
                    };
                }
            }
        }
        match kept {
            Some(kept) => merged.push(MergedDuplicate { index, kept }),
            None => grid.entry(key).or_default().push(index),
        }
    }
    merged
}
