//! Ray picking against the control polyline.

use nalgebra::{Point3, Vector3};
use pipe_geometry::{closest_points_on_two_lines, is_point_between};

use crate::line::ControlLine;

/// A world-space pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    /// Ray origin.
    pub origin: Point3<f64>,
    /// Ray direction; need not be normalized.
    pub direction: Vector3<f64>,
    /// Farthest distance along the ray considered by the pick. Default: 1000
    pub max_distance: f64,
}

impl PickRay {
    /// Create a ray with the default reach.
    #[must_use]
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction,
            max_distance: 1000.0,
        }
    }

    /// Limit how far along the ray a hit may be.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }
}

/// A point picked on the control polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePick {
    /// World-space point on the segment.
    pub position: Point3<f64>,
    /// Index of the segment endpoint nearest to `position`.
    pub closest_node: usize,
    /// Index at which a node inserted at `position` lands.
    pub insert_index: usize,
}

impl LinePick {
    /// Whether the nearest node precedes the picked point on the segment.
    #[must_use]
    pub const fn after_closest(&self) -> bool {
        self.closest_node != self.insert_index
    }
}

impl ControlLine {
    /// Find where `ray` passes within `tolerance` of a polyline segment.
    ///
    /// Segments are tested in spine order and the first hit wins. The hit
    /// must fall strictly between the segment endpoints and within the ray's
    /// reach.
    #[must_use]
    pub fn point_on_line(&self, ray: &PickRay, tolerance: f64) -> Option<LinePick> {
        let reach = ray.direction.try_normalize(f64::EPSILON)? * ray.max_distance;
        let tolerance_sq = tolerance * tolerance;

        self.nodes.windows(2).enumerate().find_map(|(i, pair)| {
            let start = pair[0].world_position();
            let end = pair[1].world_position();
            let (on_segment, on_ray) =
                closest_points_on_two_lines(&end, &(end - start), &ray.origin, &reach)?;

            let along_ray = (on_ray - ray.origin).dot(&reach);
            if along_ray < 0.0
                || along_ray > reach.norm_squared()
                || (on_segment - on_ray).norm_squared() > tolerance_sq
                || !is_point_between(&start, &end, &on_segment)
            {
                return None;
            }

            let insert_index = i + 1;
            let closest_node = if (on_segment - end).norm_squared() < (on_segment - start).norm_squared() {
                insert_index
            } else {
                i
            };
            Some(LinePick {
                position: on_segment,
                closest_node,
                insert_index,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineDefaults;
    use approx::assert_relative_eq;
    use pipe_geometry::Transform3D;

    fn right_angle() -> ControlLine {
        ControlLine::from_points(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 5.0),
                Point3::new(5.0, 0.0, 5.0),
            ],
            LineDefaults::default(),
        )
        .unwrap()
    }

    #[test]
    fn picks_first_segment() {
        let line = right_angle();
        let ray = PickRay::new(Point3::new(0.0, 10.0, 1.0), -Vector3::y());
        let pick = line.point_on_line(&ray, 0.1).unwrap();
        assert_relative_eq!(pick.position, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-10);
        assert_eq!(pick.closest_node, 0);
        assert_eq!(pick.insert_index, 1);
        assert!(pick.after_closest());
    }

    #[test]
    fn picks_second_segment_near_end() {
        let line = right_angle();
        let ray = PickRay::new(Point3::new(4.0, 10.0, 5.0), -Vector3::y());
        let pick = line.point_on_line(&ray, 0.1).unwrap();
        assert_eq!(pick.closest_node, 2);
        assert_eq!(pick.insert_index, 2);
        assert!(!pick.after_closest());
    }

    #[test]
    fn misses_outside_tolerance() {
        let line = right_angle();
        let ray = PickRay::new(Point3::new(2.0, 10.0, 2.0), -Vector3::y());
        assert!(line.point_on_line(&ray, 0.1).is_none());
    }

    #[test]
    fn misses_beyond_segment_ends() {
        let line = right_angle();
        let ray = PickRay::new(Point3::new(0.0, 10.0, -1.0), -Vector3::y());
        assert!(line.point_on_line(&ray, 0.1).is_none());
    }

    #[test]
    fn respects_reach() {
        let line = right_angle();
        let ray = PickRay::new(Point3::new(0.0, 10.0, 1.0), -Vector3::y()).with_max_distance(5.0);
        assert!(line.point_on_line(&ray, 0.1).is_none());

        let behind = PickRay::new(Point3::new(0.0, 10.0, 1.0), Vector3::y());
        assert!(line.point_on_line(&behind, 0.1).is_none());
    }

    #[test]
    fn uses_world_positions() {
        let line = right_angle().with_transform(Transform3D::from_translation(Vector3::new(0.0, 0.0, 100.0)));
        let ray = PickRay::new(Point3::new(0.0, 10.0, 101.0), -Vector3::y());
        let pick = line.point_on_line(&ray, 0.1).unwrap();
        assert_relative_eq!(pick.position, Point3::new(0.0, 0.0, 101.0), epsilon = 1e-10);
    }
}
