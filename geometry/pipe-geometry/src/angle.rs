//! Vertex angles and fillet padding.
//!
//! A fillet of radius `r` replacing the corner at a vertex with interior
//! angle `a` is tangent to both edges at distance `r / tan(a/2)` from the
//! vertex. That distance is the corner's *padding*.

use nalgebra::Point3;

/// Angle of a straight (collinear) vertex, in degrees.
pub const STRAIGHT_ANGLE: f64 = 180.0;

/// Tolerance, in degrees, for treating a vertex angle as exactly straight.
pub const STRAIGHT_ANGLE_TOLERANCE: f64 = 1e-6;

/// Tolerance, in degrees, below which a near-straight corner is swept as a
/// single pass-through sample instead of an arc.
pub const FLAT_ANGLE_TOLERANCE: f64 = 0.1;

/// Unsigned angle at `b` between the rays `b→a` and `b→c`, in degrees.
///
/// Returns a value in `[0, 180]`. Coincident points yield `0`.
///
/// # Example
///
/// ```
/// use pipe_geometry::angle_between;
/// use nalgebra::Point3;
///
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(0.0, 0.0, 5.0);
/// let c = Point3::new(0.0, 0.0, 10.0);
/// assert_eq!(angle_between(&a, &b, &c), 180.0);
/// ```
#[must_use]
pub fn angle_between(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let to_a = a - b;
    let to_c = c - b;
    // atan2 keeps precision near 0 and 180 where acos does not
    to_a.cross(&to_c).norm().atan2(to_a.dot(&to_c)).to_degrees()
}

/// Whether `angle` is a straight vertex (within [`STRAIGHT_ANGLE_TOLERANCE`] of 180°).
#[must_use]
pub fn is_straight(angle: f64) -> bool {
    (angle - STRAIGHT_ANGLE).abs() < STRAIGHT_ANGLE_TOLERANCE
}

/// Whether `angle` is close enough to a multiple of 180° that the corner
/// should be swept as a single pass-through sample.
#[must_use]
pub fn is_nearly_flat(angle: f64) -> bool {
    let reduced = angle % STRAIGHT_ANGLE;
    reduced.abs() < STRAIGHT_ANGLE_TOLERANCE
        || (reduced - STRAIGHT_ANGLE).abs() < FLAT_ANGLE_TOLERANCE
}

/// Distance along each adjacent edge consumed by a fillet of `radius` at a
/// vertex with interior `angle` (degrees).
///
/// `radius / sin(angle/2) * cos(angle/2)`, and `0` for a straight vertex.
///
/// # Example
///
/// ```
/// use pipe_geometry::calculate_padding;
///
/// assert_eq!(calculate_padding(180.0, 3.0), 0.0);
/// assert!((calculate_padding(90.0, 1.0) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn calculate_padding(angle: f64, radius: f64) -> f64 {
    if is_straight(angle) {
        return 0.0;
    }
    let half = (angle / 2.0).to_radians();
    radius / half.sin() * half.cos()
}

/// Distance from the vertex to the fillet arc center, `radius / sin(angle/2)`.
///
/// `0` for a straight vertex.
#[must_use]
pub fn turn_arc_center_distance(angle: f64, radius: f64) -> f64 {
    if is_straight(angle) {
        return 0.0;
    }
    radius / (angle / 2.0).to_radians().sin()
}
