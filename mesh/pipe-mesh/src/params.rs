//! Mesh build parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::uv::UvProperties;

/// Smallest usable cross-section polygon.
pub const MIN_CIRCLE_DETAIL: u32 = 3;

/// Which surfaces of the pipe to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshSides {
    /// Outer wall. Default: true
    pub outer: bool,
    /// Inner wall. Default: true
    pub inner: bool,
    /// End-cap annuli. Default: true
    pub edges: bool,
}

impl Default for MeshSides {
    fn default() -> Self {
        Self {
            outer: true,
            inner: true,
            edges: true,
        }
    }
}

impl MeshSides {
    /// Only the outer wall.
    #[must_use]
    pub const fn outer_only() -> Self {
        Self {
            outer: true,
            inner: false,
            edges: false,
        }
    }

    /// Number of lengthwise walls enabled.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        usize::from(self.outer) + usize::from(self.inner)
    }
}

/// Parameters for building a pipe mesh.
///
/// # Example
///
/// ```
/// use pipe_mesh::{MeshBuildParams, MeshSides};
///
/// let params = MeshBuildParams::default()
///     .with_circle_detail(12)
///     .with_sides(MeshSides::outer_only());
/// assert_eq!(params.circle_detail, 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshBuildParams {
    /// Sides of the cross-section polygon.
    ///
    /// Must be at least [`MIN_CIRCLE_DETAIL`]. Default: 5
    pub circle_detail: u32,

    /// Extra rotation of every ring around the spine, in degrees.
    ///
    /// Default: 0
    pub rotation: f64,

    /// Surfaces to generate.
    pub sides: MeshSides,

    /// Texture coordinate layout.
    pub uv: UvProperties,
}

impl Default for MeshBuildParams {
    fn default() -> Self {
        Self {
            circle_detail: 5,
            rotation: 0.0,
            sides: MeshSides::default(),
            uv: UvProperties::default(),
        }
    }
}

impl MeshBuildParams {
    /// Set the cross-section polygon sides.
    #[must_use]
    pub const fn with_circle_detail(mut self, circle_detail: u32) -> Self {
        self.circle_detail = circle_detail;
        self
    }

    /// Set the ring rotation in degrees.
    #[must_use]
    pub const fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Set which surfaces to generate.
    #[must_use]
    pub const fn with_sides(mut self, sides: MeshSides) -> Self {
        self.sides = sides;
        self
    }

    /// Set the UV layout.
    #[must_use]
    pub const fn with_uv(mut self, uv: UvProperties) -> Self {
        self.uv = uv;
        self
    }

    /// Vertices per ring; the seam vertex is duplicated.
    #[must_use]
    pub const fn ring_size(&self) -> usize {
        self.circle_detail as usize + 1
    }
}
