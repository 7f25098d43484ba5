//! Direction selection helpers.

use nalgebra::Vector3;

/// Find a unit vector perpendicular to `v`.
///
/// Crosses `v` with the coordinate axis least aligned with it, so the result
/// is well conditioned for any non-zero input. A zero input yields `+Y`.
///
/// # Example
///
/// ```
/// use pipe_geometry::find_perpendicular;
/// use nalgebra::Vector3;
///
/// let v = Vector3::new(0.3, -2.0, 1.0);
/// assert!(find_perpendicular(v).dot(&v).abs() < 1e-12);
/// ```
#[must_use]
pub fn find_perpendicular(v: Vector3<f64>) -> Vector3<f64> {
    let abs_x = v.x.abs();
    let abs_y = v.y.abs();
    let abs_z = v.z.abs();

    let axis = if abs_x <= abs_y && abs_x <= abs_z {
        Vector3::x()
    } else if abs_y <= abs_z {
        Vector3::y()
    } else {
        Vector3::z()
    };

    v.cross(&axis)
        .try_normalize(f64::EPSILON)
        .unwrap_or(Vector3::y())
}

/// Pick the direction best aligned with `reference` among `candidates` and
/// their negations.
///
/// Candidates are normalized before comparison; zero-length candidates are
/// skipped. Ties keep the earliest candidate, preferring it over its negation.
/// Returns `None` when no candidate has a usable direction.
///
/// # Example
///
/// ```
/// use pipe_geometry::most_codirectional;
/// use nalgebra::Vector3;
///
/// let best = most_codirectional(&[Vector3::x(), Vector3::y()], &Vector3::new(0.0, -1.0, 0.1));
/// assert_eq!(best, Some(-Vector3::y()));
/// ```
#[must_use]
pub fn most_codirectional(
    candidates: &[Vector3<f64>],
    reference: &Vector3<f64>,
) -> Option<Vector3<f64>> {
    let mut best: Option<(Vector3<f64>, f64)> = None;

    for candidate in candidates {
        let Some(unit) = candidate.try_normalize(f64::EPSILON) else {
            continue;
        };
        for signed in [unit, -unit] {
            let dot = reference.dot(&signed);
            if best.is_none_or(|(_, max)| dot > max) {
                best = Some((signed, dot));
            }
        }
    }

    best.map(|(direction, _)| direction)
}
