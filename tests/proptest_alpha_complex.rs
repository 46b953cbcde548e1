//! Property-based tests for the Delaunay triangulation and its alpha complex.
//!
//! ## Invariants Tested
//!
//! - **Empty circumsphere condition**: no input point lies strictly inside the
//!   circumsphere of any finite tetrahedron (brute force over all points)
//! - **Structural validity**: neighbor symmetry, facet sharing and Euler characteristic
//! - **Monotonicity**: a simplex's classification never decreases as α grows,
//!   so members at α₁ remain members at every α₂ > α₁
//! - **Idempotence**: repeated queries at one α return identical shapes
//! - **Limits**: α = 0 yields no triangles; α = ∞ yields the convex hull

use delaunay_alpha::prelude::*;
use proptest::prelude::*;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for generating 3D points in a bounded box.
fn point_3d() -> impl Strategy<Value = Point> {
    prop::array::uniform3(-10.0..10.0f64).prop_map(Point::new)
}

fn point_cloud() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(point_3d(), 6..28)
}

/// Builds the triangulation, discarding inputs that happen to be degenerate.
fn build(points: &[Point]) -> Option<DelaunayTriangulation> {
    match DelaunayTriangulation::new(points) {
        Ok(dt) => Some(dt),
        Err(TriangulationConstructionError::GeometricDegeneracy { .. }) => None,
        Err(err) => panic!("unexpected construction failure: {err}"),
    }
}

// =============================================================================
// TRIANGULATION PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_empty_circumsphere(points in point_cloud()) {
        let Some(dt) = build(&points) else {
            return Ok(());
        };
        prop_assert!(dt.is_valid().is_ok(), "invalid: {:?}", dt.is_valid());

        for [a, b, c, d] in dt.tetrahedra() {
            let tet = [points[a], points[b], points[c], points[d]];
            prop_assert_eq!(
                orientation(&tet[0], &tet[1], &tet[2], &tet[3]),
                Orientation::POSITIVE
            );
            for (index, p) in points.iter().enumerate() {
                if [a, b, c, d].contains(&index) || dt.vertex_key(index).is_none() {
                    continue;
                }
                prop_assert_ne!(
                    in_sphere(&tet[0], &tet[1], &tet[2], &tet[3], p),
                    InSphere::INSIDE,
                    "point {} inside circumsphere of {:?}",
                    index,
                    [a, b, c, d]
                );
            }
        }
    }

    #[test]
    fn prop_every_input_point_is_a_vertex(points in point_cloud()) {
        let Some(dt) = build(&points) else {
            return Ok(());
        };
        let merged = dt.merged_duplicates().len();
        prop_assert_eq!(dt.number_of_vertices() + merged, points.len());
        for index in 0..points.len() {
            if let Some(vkey) = dt.vertex_key(index) {
                prop_assert_eq!(dt.vertex_index(vkey), Some(index));
            }
        }
    }
}

// =============================================================================
// ALPHA COMPLEX PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_classification_is_monotone(
        points in point_cloud(),
        a1 in 0.0..12.0f64,
        delta in 0.0..6.0f64,
    ) {
        let Some(dt) = build(&points) else {
            return Ok(());
        };
        let complex = AlphaComplex::new(&dt);
        let a2 = a1 + delta;

        let intervals = complex
            .cells()
            .iter()
            .map(|c| c.interval)
            .chain(complex.facets().iter().map(|f| f.interval))
            .chain(complex.edges().iter().map(|e| e.interval))
            .chain(complex.vertices().iter().map(|v| v.interval));
        for interval in intervals {
            prop_assert!(interval.classify(a1) <= interval.classify(a2));
            if interval.is_member(a1) {
                prop_assert!(interval.is_member(a2));
            }
        }
    }

    #[test]
    fn prop_faces_join_no_later_than_cofaces(points in point_cloud()) {
        let Some(dt) = build(&points) else {
            return Ok(());
        };
        let complex = AlphaComplex::new(&dt);
        let edge_member: FastHashMap<[usize; 2], f64> = complex
            .edges()
            .iter()
            .map(|e| (e.vertices, e.interval.member()))
            .collect();
        for facet in complex.facets() {
            let [a, b, c] = facet.vertices;
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let key = [u.min(v), u.max(v)];
                let member = edge_member.get(&key).copied();
                prop_assert!(member.is_some());
                prop_assert!(member.unwrap_or(f64::INFINITY) <= facet.interval.member());
            }
        }
    }

    #[test]
    fn prop_queries_are_idempotent(points in point_cloud(), alpha in 0.0..15.0f64) {
        let Some(dt) = build(&points) else {
            return Ok(());
        };
        let complex = AlphaComplex::new(&dt);
        for mode in [AlphaShapeMode::Regular, AlphaShapeMode::General] {
            let first = complex.shape(alpha, mode).unwrap();
            let second = complex.shape(alpha, mode).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_alpha_limits(points in point_cloud()) {
        let Some(dt) = build(&points) else {
            return Ok(());
        };
        let complex = AlphaComplex::new(&dt);
        prop_assert!(complex.shape(0.0, AlphaShapeMode::Regular).unwrap().is_empty());
        let hull = complex.shape(f64::INFINITY, AlphaShapeMode::Regular).unwrap();
        prop_assert_eq!(hull.number_of_triangles(), dt.convex_hull_facets().len());
    }
}
