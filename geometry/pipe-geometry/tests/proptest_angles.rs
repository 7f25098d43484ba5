//! Property-based tests for vertex angles and fillet padding.
//!
//! Run with: cargo test -p pipe-geometry -- proptest

use nalgebra::Point3;
use pipe_geometry::{angle_between, calculate_padding, most_codirectional};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Three points whose outer points are not coincident with the vertex.
fn arb_corner() -> impl Strategy<Value = (Point3<f64>, Point3<f64>, Point3<f64>)> {
    (arb_point(), arb_point(), arb_point()).prop_filter("outer points away from vertex", |(a, b, c)| {
        (a - b).norm() > 0.1 && (c - b).norm() > 0.1
    })
}

// =============================================================================
// Angle properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_angle_in_range((a, b, c) in arb_corner()) {
        let angle = angle_between(&a, &b, &c);
        prop_assert!((0.0..=180.0).contains(&angle));
    }

    #[test]
    fn proptest_angle_symmetric((a, b, c) in arb_corner()) {
        let forward = angle_between(&a, &b, &c);
        let backward = angle_between(&c, &b, &a);
        prop_assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn proptest_angle_scale_invariant((a, b, c) in arb_corner(), scale in 0.1..100.0f64) {
        let scaled = |p: &Point3<f64>| b + (p - b) * scale;
        let original = angle_between(&a, &b, &c);
        let rescaled = angle_between(&scaled(&a), &b, &scaled(&c));
        prop_assert!((original - rescaled).abs() < 1e-7);
    }

    #[test]
    fn proptest_collinear_between_is_straight(
        b in arb_point(),
        dir in prop::array::uniform3(-1.0..1.0f64),
        near in 0.1..50.0f64,
        far in 0.1..50.0f64,
    ) {
        let dir = nalgebra::Vector3::from(dir);
        prop_assume!(dir.norm() > 1e-2);
        let a = b - dir * near;
        let c = b + dir * far;
        prop_assert!((angle_between(&a, &b, &c) - 180.0).abs() < 1e-6);
    }
}

// =============================================================================
// Padding properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_padding_zero_when_straight(radius in 0.0..1000.0f64) {
        prop_assert_eq!(calculate_padding(180.0, radius), 0.0);
    }

    #[test]
    fn proptest_padding_monotonic(
        radius in 0.01..100.0f64,
        wide in 1.0..179.0f64,
        delta in 0.01..1.0f64,
    ) {
        let narrow = wide - delta;
        prop_assume!(narrow > 0.5);
        prop_assert!(calculate_padding(narrow, radius) > calculate_padding(wide, radius));
    }

    #[test]
    fn proptest_codirectional_never_negative(
        candidates in prop::collection::vec(prop::array::uniform3(-1.0..1.0f64), 1..6),
        reference in prop::array::uniform3(-1.0..1.0f64),
    ) {
        let candidates: Vec<_> = candidates.into_iter().map(nalgebra::Vector3::from).collect();
        let reference = nalgebra::Vector3::from(reference);
        if let Some(best) = most_codirectional(&candidates, &reference) {
            prop_assert!(best.dot(&reference) >= 0.0);
        }
    }
}
