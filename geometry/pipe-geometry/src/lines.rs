//! Line and segment queries.

use nalgebra::{Point3, Vector3};

/// Closest points between two infinite lines `p1 + s·d1` and `p2 + t·d2`.
///
/// Returns `(on_first, on_second)`, or `None` when the lines are parallel or
/// a direction is zero.
///
/// # Example
///
/// ```
/// use pipe_geometry::closest_points_on_two_lines;
/// use nalgebra::{Point3, Vector3};
///
/// let (a, b) = closest_points_on_two_lines(
///     &Point3::new(0.0, 0.0, 0.0), &Vector3::x(),
///     &Point3::new(0.0, 1.0, 5.0), &Vector3::z(),
/// ).unwrap();
/// assert_eq!(a, Point3::new(0.0, 0.0, 0.0));
/// assert_eq!(b, Point3::new(0.0, 1.0, 0.0));
/// ```
#[must_use]
pub fn closest_points_on_two_lines(
    p1: &Point3<f64>,
    d1: &Vector3<f64>,
    p2: &Point3<f64>,
    d2: &Vector3<f64>,
) -> Option<(Point3<f64>, Point3<f64>)> {
    let a = d1.dot(d1);
    let b = d1.dot(d2);
    let e = d2.dot(d2);

    let denom = a * e - b * b;
    if denom.abs() <= f64::EPSILON * a.max(e).max(1.0) {
        return None;
    }

    let r = p1 - p2;
    let c = d1.dot(&r);
    let f = d2.dot(&r);

    let s = (b * f - c * e) / denom;
    let t = (a * f - c * b) / denom;

    Some((p1 + d1 * s, p2 + d2 * t))
}

/// Whether `c` lies strictly between `a` and `b`.
///
/// Intended for a `c` already known to be (near) the line through `a` and
/// `b`: the test only checks that `c` is on the inner side of both endpoints.
/// Degenerate inputs (coincident points) return `false`.
#[must_use]
pub fn is_point_between(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> bool {
    let (Some(ab), Some(bc), Some(ac)) = (
        (b - a).try_normalize(f64::EPSILON),
        (c - b).try_normalize(f64::EPSILON),
        (c - a).try_normalize(f64::EPSILON),
    ) else {
        return false;
    };
    ab.dot(&bc) < 0.0 && (-ab).dot(&ac) < 0.0
}

/// Closest point to `p` on the segment `a..b`, with its parameter in `[0, 1]`.
#[must_use]
pub fn closest_point_on_segment(
    a: &Point3<f64>,
    b: &Point3<f64>,
    p: &Point3<f64>,
) -> (Point3<f64>, f64) {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < f64::EPSILON {
        return (*a, 0.0);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn skew_lines() {
        let (a, b) = closest_points_on_two_lines(
            &Point3::new(-3.0, 0.0, 0.0),
            &Vector3::new(2.0, 0.0, 0.0),
            &Point3::new(1.0, 2.0, 7.0),
            &Vector3::new(0.0, 0.0, -1.0),
        )
        .unwrap();
        assert_relative_eq!(a, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(b, Point3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn parallel_lines_have_no_result() {
        let result = closest_points_on_two_lines(
            &Point3::origin(),
            &Vector3::x(),
            &Point3::new(0.0, 1.0, 0.0),
            &Vector3::new(-4.0, 0.0, 0.0),
        );
        assert!(result.is_none());
    }

    #[test]
    fn zero_direction_has_no_result() {
        let result = closest_points_on_two_lines(
            &Point3::origin(),
            &Vector3::zeros(),
            &Point3::new(0.0, 1.0, 0.0),
            &Vector3::x(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn between_endpoints() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(0.0, 0.0, 10.0);
        assert!(is_point_between(&a, &b, &Point3::new(0.0, 0.0, 4.0)));
        assert!(!is_point_between(&a, &b, &Point3::new(0.0, 0.0, 11.0)));
        assert!(!is_point_between(&a, &b, &Point3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn between_rejects_endpoints_and_degenerate() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        assert!(!is_point_between(&a, &b, &a));
        assert!(!is_point_between(&a, &b, &b));
        assert!(!is_point_between(&a, &a, &b));
    }

    #[test]
    fn segment_projection_clamps() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        let (p, t) = closest_point_on_segment(&a, &b, &Point3::new(1.0, 5.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(t, 0.5, epsilon = 1e-12);

        let (p, t) = closest_point_on_segment(&a, &b, &Point3::new(9.0, 0.0, 0.0));
        assert_relative_eq!(p, b, epsilon = 1e-12);
        assert_relative_eq!(t, 1.0);
    }
}
