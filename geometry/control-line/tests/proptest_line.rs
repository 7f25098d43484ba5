//! Property-based tests for control-line editing.
//!
//! Run with: cargo test -p control-line -- proptest

use control_line::{ControlLine, LineDefaults, LineSettings, Space, TurnSettings};
use nalgebra::Point3;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-20.0..20.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

fn arb_edit() -> impl Strategy<Value = (Point3<f64>, usize)> {
    (arb_point(), 0usize..16)
}

fn arb_detail() -> impl Strategy<Value = u32> {
    prop_oneof![Just(1u32), 2u32..12]
}

fn arb_settings() -> impl Strategy<Value = LineSettings> {
    any::<bool>().prop_map(|unchecked| {
        if unchecked {
            LineSettings::default().unchecked_angles()
        } else {
            LineSettings::default()
        }
    })
}

/// Grow a line from a straight segment by applying every allowed insert.
fn grow(edits: &[(Point3<f64>, usize)], detail: u32) -> ControlLine {
    grow_with(edits, detail, LineSettings::default())
}

fn grow_with(edits: &[(Point3<f64>, usize)], detail: u32, settings: LineSettings) -> ControlLine {
    let defaults = LineDefaults::default().with_turn(TurnSettings::new(1.0, detail));
    let mut line = ControlLine::from_points(
        &[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 10.0)],
        defaults,
    )
    .unwrap()
    .with_settings(settings);
    for (position, index) in edits {
        let index = index % (line.len() + 1);
        if line.is_add_allowed(position, index, line.defaults().turn.radius(), Space::Local) {
            line.add_node(index, *position, Space::Local).unwrap();
        }
    }
    line
}

// =============================================================================
// Validity invariants
// =============================================================================

fn fillets_fit(line: &ControlLine) -> bool {
    line.nodes().windows(2).all(|pair| {
        let edge = (pair[1].position() - pair[0].position()).norm();
        edge - pair[0].padding() - pair[1].padding() > -1e-9
    })
}

fn angles_respected(line: &ControlLine) -> bool {
    let min = line.settings().min_allowed_angle;
    line.nodes()
        .iter()
        .all(|node| node.angle_between_neighbors() >= min - 1e-9)
}

proptest! {
    #[test]
    fn proptest_allowed_adds_keep_line_valid(
        edits in prop::collection::vec(arb_edit(), 1..12),
        detail in arb_detail(),
    ) {
        let line = grow(&edits, detail);
        prop_assert!(fillets_fit(&line));
        prop_assert!(angles_respected(&line));
    }

    #[test]
    fn proptest_allowed_deletes_keep_line_valid(
        edits in prop::collection::vec(arb_edit(), 1..12),
        deletes in prop::collection::vec(0usize..16, 1..6),
    ) {
        let mut line = grow(&edits, 5);
        for index in deletes {
            let index = index % line.len();
            if line.is_delete_allowed(index).is_allowed() {
                line.delete_node(index).unwrap();
            }
        }
        prop_assert!(line.len() >= 2);
        prop_assert!(fillets_fit(&line));
        prop_assert!(angles_respected(&line));
    }

    #[test]
    fn proptest_allowed_interior_moves_keep_fillets(
        edits in prop::collection::vec(arb_edit(), 1..12),
        moves in prop::collection::vec(arb_edit(), 1..6),
    ) {
        let mut line = grow(&edits, 5);
        for (position, index) in moves {
            let index = index % line.len();
            // Endpoint moves may shrink a neighbour's fillet past its old spacing.
            if index == 0 || index == line.len() - 1 {
                continue;
            }
            if line.is_moving_allowed(index, &position, Space::Local) {
                line.move_node(index, position, Space::Local).unwrap();
            }
        }
        prop_assert!(fillets_fit(&line));
    }
}

// =============================================================================
// Tessellation properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_chord_frames_orthonormal(
        edits in prop::collection::vec(arb_edit(), 1..12),
        detail in arb_detail(),
    ) {
        let line = grow(&edits, detail);
        for chord in line.chords() {
            prop_assert!(chord.frame().is_orthonormal(1e-6));
        }
    }

    #[test]
    fn proptest_consecutive_ups_stay_in_hemisphere(
        edits in prop::collection::vec(arb_edit(), 1..12),
        detail in 1u32..12,
        settings in arb_settings(),
    ) {
        let line = grow_with(&edits, detail, settings);
        let ups: Vec<_> = line.chords().map(|chord| chord.up()).collect();
        for pair in ups.windows(2) {
            prop_assert!(pair[0].dot(&pair[1]) >= -1e-9);
        }
    }

    #[test]
    fn proptest_chord_count_matches_detail(
        edits in prop::collection::vec(arb_edit(), 1..12),
        detail in arb_detail(),
    ) {
        let line = grow(&edits, detail);
        let expected: usize = line
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let interior = i > 0 && i + 1 < line.len();
                if interior && !pipe_geometry::is_nearly_flat(node.angle_between_neighbors()) {
                    detail as usize
                } else {
                    1
                }
            })
            .sum();
        prop_assert_eq!(line.chord_count(), expected);
    }

    #[test]
    fn proptest_rebuild_is_deterministic(
        edits in prop::collection::vec(arb_edit(), 1..12),
        detail in arb_detail(),
    ) {
        let mut line = grow(&edits, detail);
        let before: Vec<_> = line.chords().copied().collect();
        line.rebuild_chords();
        let after: Vec<_> = line.chords().copied().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn proptest_endpoint_chords_sit_on_endpoints(
        edits in prop::collection::vec(arb_edit(), 1..12),
    ) {
        let line = grow(&edits, 5);
        let first = line.chord(0).unwrap();
        let last = line.chord(line.chord_count() - 1).unwrap();
        prop_assert_eq!(first.position(), line.nodes()[0].position());
        prop_assert_eq!(last.position(), line.nodes()[line.len() - 1].position());
    }
}
