//! Position/rotation/scale transform for local↔world conversion.

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};

/// A 3D affine transform composed as `translation · rotation · scale`.
///
/// Points go through all three components; directions only through the
/// rotation, so a unit direction stays unit length.
///
/// # Example
///
/// ```
/// use pipe_geometry::Transform3D;
/// use nalgebra::{Point3, Vector3};
///
/// let t = Transform3D::from_translation(Vector3::new(1.0, 2.0, 3.0));
/// let world = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 3.0));
/// assert_eq!(t.inverse_transform_point(&world), Point3::new(1.0, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform3D {
    translation: Vector3<f64>,
    rotation: UnitQuaternion<f64>,
    scale: Vector3<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create the identity transformation (no change).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }

    /// Create a transform from translation, rotation and per-axis scale.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SingularScale`] if any scale component is zero
    /// or not finite.
    pub fn from_parts(
        translation: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        scale: Vector3<f64>,
    ) -> GeometryResult<Self> {
        if scale.iter().any(|s| !s.is_finite() || s.abs() < f64::EPSILON) {
            return Err(GeometryError::SingularScale {
                x: scale.x,
                y: scale.y,
                z: scale.z,
            });
        }
        Ok(Self {
            translation,
            rotation,
            scale,
        })
    }

    /// Create a pure translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Create a pure rotation.
    #[must_use]
    pub fn from_rotation(rotation: UnitQuaternion<f64>) -> Self {
        Self {
            rotation,
            ..Self::identity()
        }
    }

    /// Translation component (the transform origin in world space).
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    /// Rotation component.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.rotation
    }

    /// Scale component.
    #[must_use]
    pub fn scale(&self) -> Vector3<f64> {
        self.scale
    }

    /// Replace the translation component.
    pub fn set_translation(&mut self, translation: Vector3<f64>) {
        self.translation = translation;
    }

    /// Copy of this transform with a different translation.
    #[must_use]
    pub fn with_translation(mut self, translation: Vector3<f64>) -> Self {
        self.translation = translation;
        self
    }

    /// Copy of this transform with rotation reset to identity and scale to one.
    #[must_use]
    pub fn translation_only(&self) -> Self {
        Self::from_translation(self.translation)
    }

    /// The equivalent 4x4 matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Map a local point to world space.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        let scaled = local.coords.component_mul(&self.scale);
        Point3::from(self.rotation * scaled + self.translation)
    }

    /// Map a world point to local space.
    #[must_use]
    pub fn inverse_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        let unrotated = self.rotation.inverse() * (world.coords - self.translation);
        Point3::from(unrotated.component_div(&self.scale))
    }

    /// Map a local direction to world space (rotation only).
    #[must_use]
    pub fn transform_direction(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Map a world direction to local space (rotation only).
    #[must_use]
    pub fn inverse_transform_direction(&self, world: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse() * world
    }

    /// Map a local displacement to world space (rotation and scale).
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local.component_mul(&self.scale)
    }

    /// Map a world displacement to local space (rotation and scale).
    #[must_use]
    pub fn inverse_transform_vector(&self, world: &Vector3<f64>) -> Vector3<f64> {
        (self.rotation.inverse() * world).component_div(&self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn sample() -> Transform3D {
        Transform3D::from_parts(
            Vector3::new(5.0, -1.0, 2.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            Vector3::new(2.0, 2.0, 2.0),
        )
        .unwrap()
    }

    #[test]
    fn identity_is_noop() {
        let t = Transform3D::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(t.transform_point(&p), p);
        assert_eq!(t.inverse_transform_point(&p), p);
    }

    #[test]
    fn point_roundtrip() {
        let t = sample();
        let p = Point3::new(0.3, -4.0, 7.5);
        assert_relative_eq!(t.inverse_transform_point(&t.transform_point(&p)), p, epsilon = 1e-12);
    }

    #[test]
    fn point_applies_scale_rotation_translation() {
        let t = sample();
        // (1,0,0) -> scale (2,0,0) -> rotate 90° about Z (0,2,0) -> translate
        assert_relative_eq!(
            t.transform_point(&Point3::new(1.0, 0.0, 0.0)),
            Point3::new(5.0, 1.0, 2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn direction_ignores_scale() {
        let t = sample();
        let d = t.transform_direction(&Vector3::x());
        assert_relative_eq!(d, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(t.inverse_transform_direction(&d), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn vector_roundtrip() {
        let t = sample();
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_relative_eq!(t.inverse_transform_vector(&t.transform_vector(&v)), v, epsilon = 1e-12);
    }

    #[test]
    fn matrix_matches_point_transform() {
        let t = sample();
        let p = Point3::new(1.5, -2.0, 0.25);
        let via_matrix = t.to_matrix().transform_point(&p);
        assert_relative_eq!(via_matrix, t.transform_point(&p), epsilon = 1e-12);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let err = Transform3D::from_parts(
            Vector3::zeros(),
            UnitQuaternion::identity(),
            Vector3::new(1.0, 0.0, 1.0),
        );
        assert!(matches!(err, Err(GeometryError::SingularScale { .. })));
    }
}
