//! Pipe builder configuration.

use pipe_mesh::{LodSettings, MeshBuildParams};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything a [`PipeBuilder`](crate::PipeBuilder) needs besides its line.
///
/// # Example
///
/// ```
/// use pipe_builder::PipeConfig;
///
/// let config = PipeConfig::default()
///     .with_name("Drain")
///     .with_circle_detail(12)
///     .with_lods(3, 4);
///
/// assert_eq!(config.lods.count(), 3);
/// assert_eq!(config.lods.degrade_step(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipeConfig {
    /// Base name of generated meshes.
    ///
    /// Default: "Pipe"
    pub name: String,

    /// Mesh build parameters for the preview and the finest LOD.
    pub mesh: MeshBuildParams,

    /// LOD level count and degrade step, kept clamped to `mesh.circle_detail`.
    pub lods: LodSettings,

    /// Material the pipe renders with; combine groups submeshes by it.
    ///
    /// Default: "Default"
    pub material: String,

    /// Whether edits rebuild the preview mesh.
    ///
    /// Default: true
    pub preview: bool,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            name: "Pipe".to_string(),
            mesh: MeshBuildParams::default(),
            lods: LodSettings::default(),
            material: "Default".to_string(),
            preview: true,
        }
    }
}

impl PipeConfig {
    /// Set the base mesh name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the mesh parameters, re-clamping the LOD settings.
    #[must_use]
    pub fn with_mesh_params(mut self, mesh: MeshBuildParams) -> Self {
        self.mesh = mesh;
        self.lods.clamp_to(mesh.circle_detail);
        self
    }

    /// Set the base circle detail, re-clamping the LOD settings.
    #[must_use]
    pub fn with_circle_detail(mut self, circle_detail: u32) -> Self {
        self.mesh.circle_detail = circle_detail;
        self.lods.clamp_to(circle_detail);
        self
    }

    /// Set the LOD count and degrade step, clamped to the circle detail.
    #[must_use]
    pub fn with_lods(mut self, count: u32, degrade_step: u32) -> Self {
        self.lods = LodSettings::new(count, degrade_step, self.mesh.circle_detail);
        self
    }

    /// Set the material.
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    /// Enable or disable preview rebuilds.
    #[must_use]
    pub const fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipeConfig::default();
        assert_eq!(config.name, "Pipe");
        assert_eq!(config.mesh.circle_detail, 5);
        assert_eq!(config.lods.count(), 1);
        assert_eq!(config.lods.degrade_step(), 0);
        assert!(config.preview);
    }

    #[test]
    fn lods_clamped_to_detail() {
        // detail 8 allows a step of at most 5 and then two levels.
        let config = PipeConfig::default().with_circle_detail(8).with_lods(10, 9);
        assert_eq!(config.lods.degrade_step(), 5);
        assert_eq!(config.lods.count(), 2);
    }

    #[test]
    fn lowering_detail_reclamps_lods() {
        let config = PipeConfig::default()
            .with_circle_detail(20)
            .with_lods(4, 5)
            .with_circle_detail(9);
        assert_eq!(config.lods.degrade_step(), 5);
        assert_eq!(config.lods.count(), 2);
    }
}
