//! Orientation frames for swept cross-sections.
//!
//! A [`Frame`] is the orientation carried by every chord sample: `forward`
//! runs along the spine, `up` is the reference direction the cross-section
//! ring starts from, and `right` completes a right-handed basis.

use nalgebra::{Matrix3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::direction::find_perpendicular;

/// An orthonormal forward/up/right frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Direction of travel along the spine.
    pub forward: Vector3<f64>,
    /// Reference direction perpendicular to `forward`.
    pub up: Vector3<f64>,
    /// `up × forward`.
    pub right: Vector3<f64>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
        }
    }
}

impl Frame {
    /// Build a frame looking along `forward`, with `up` as close to `up_hint`
    /// as orthogonality allows.
    ///
    /// A zero `forward` falls back to `+Z`. When `up_hint` is zero or parallel
    /// to `forward`, an arbitrary perpendicular is used instead.
    ///
    /// # Example
    ///
    /// ```
    /// use pipe_geometry::Frame;
    /// use nalgebra::Vector3;
    ///
    /// let frame = Frame::look_rotation(Vector3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 1.0, 1.0));
    /// assert!((frame.up - Vector3::y()).norm() < 1e-12);
    /// assert!(frame.is_orthonormal(1e-12));
    /// ```
    #[must_use]
    pub fn look_rotation(forward: Vector3<f64>, up_hint: Vector3<f64>) -> Self {
        let forward = forward.try_normalize(f64::EPSILON).unwrap_or(Vector3::z());

        let right = up_hint
            .cross(&forward)
            .try_normalize(1e-10)
            .unwrap_or_else(|| find_perpendicular(forward).cross(&forward));
        let up = forward.cross(&right);

        Self { forward, up, right }
    }

    /// Build a frame along `forward` with an arbitrary but deterministic `up`.
    #[must_use]
    pub fn from_forward(forward: Vector3<f64>) -> Self {
        let forward = forward.try_normalize(f64::EPSILON).unwrap_or(Vector3::z());
        Self::look_rotation(forward, find_perpendicular(forward))
    }

    /// Rotation taking `+X/+Y/+Z` onto `right/up/forward`.
    #[must_use]
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        let basis = Matrix3::from_columns(&[self.right, self.up, self.forward]);
        UnitQuaternion::from_matrix(&basis)
    }

    /// Frame whose axes are the images of `+X/+Y/+Z` under `rotation`.
    #[must_use]
    pub fn from_quaternion(rotation: &UnitQuaternion<f64>) -> Self {
        Self {
            forward: rotation * Vector3::z(),
            up: rotation * Vector3::y(),
            right: rotation * Vector3::x(),
        }
    }

    /// Apply a rotation to every axis.
    #[must_use]
    pub fn rotated(&self, rotation: &UnitQuaternion<f64>) -> Self {
        Self {
            forward: rotation * self.forward,
            up: rotation * self.up,
            right: rotation * self.right,
        }
    }

    /// Check whether the axes are unit length and mutually perpendicular.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        (self.forward.norm() - 1.0).abs() < tolerance
            && (self.up.norm() - 1.0).abs() < tolerance
            && (self.right.norm() - 1.0).abs() < tolerance
            && self.forward.dot(&self.up).abs() < tolerance
            && self.forward.dot(&self.right).abs() < tolerance
            && self.up.dot(&self.right).abs() < tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn look_rotation_orthogonalizes_up() {
        let frame = Frame::look_rotation(Vector3::x(), Vector3::new(1.0, 1.0, 0.0));
        assert_relative_eq!(frame.forward, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(frame.up, Vector3::y(), epsilon = 1e-12);
        assert!(frame.is_orthonormal(1e-12));
    }

    #[test]
    fn look_rotation_is_right_handed() {
        let frame = Frame::look_rotation(Vector3::z(), Vector3::y());
        assert_relative_eq!(frame.right, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(frame.right.cross(&frame.up), frame.forward, epsilon = 1e-12);
    }

    #[test]
    fn look_rotation_parallel_hint() {
        let frame = Frame::look_rotation(Vector3::y(), Vector3::y() * 3.0);
        assert!(frame.is_orthonormal(1e-12));
        assert_relative_eq!(frame.forward, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn look_rotation_zero_forward() {
        let frame = Frame::look_rotation(Vector3::zeros(), Vector3::y());
        assert_relative_eq!(frame.forward, Vector3::z(), epsilon = 1e-12);
        assert!(frame.is_orthonormal(1e-12));
    }

    #[test]
    fn from_forward_any_axis() {
        for forward in [Vector3::x(), Vector3::new(0.0, -3.0, 0.0), Vector3::new(1.0, 2.0, 3.0)] {
            let frame = Frame::from_forward(forward);
            assert!(frame.is_orthonormal(1e-12));
            assert_relative_eq!(frame.forward, forward.normalize(), epsilon = 1e-12);
        }
    }

    #[test]
    fn quaternion_roundtrip() {
        let frame = Frame::look_rotation(Vector3::new(1.0, 2.0, -0.5), Vector3::new(0.0, 0.0, 1.0));
        let back = Frame::from_quaternion(&frame.to_quaternion());
        assert_relative_eq!(back.forward, frame.forward, epsilon = 1e-10);
        assert_relative_eq!(back.up, frame.up, epsilon = 1e-10);
        assert_relative_eq!(back.right, frame.right, epsilon = 1e-10);
    }
}
