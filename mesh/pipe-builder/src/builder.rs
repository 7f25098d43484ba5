//! The pipe builder: a control line plus everything generated from it.

use control_line::{ControlLine, LineDefaults, Space};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use pipe_geometry::Transform3D;
use pipe_mesh::{
    LodInfo, LodSettings, MIN_CIRCLE_DETAIL, MeshBuilder, MeshError, MeshSides, MeshSink, PipeMesh,
    UvProperties, forecast_triangles, lod_name, transition_heights,
};
use tracing::info;

use crate::config::PipeConfig;
use crate::error::PipeResult;
use crate::generation::{GenerationStage, LodGeneration, SaveTarget, finish_generation};

/// Owns a pipe's control line and configuration, and the preview mesh and
/// LOD meshes generated from them.
///
/// Line edits go through [`PipeBuilder::edit`] or the `try_*` helpers so
/// the LOD forecasts and the preview stay current.
///
/// # Example
///
/// ```
/// use pipe_builder::{PipeBuilder, PipeConfig};
/// use control_line::Space;
/// use nalgebra::Point3;
///
/// let mut pipe = PipeBuilder::with_default_line(PipeConfig::default()).unwrap();
/// let added = pipe.try_add_node(3, Point3::new(0.0, 0.0, 10.0), Space::Local).unwrap();
/// assert!(added);
///
/// let outcome = pipe.generate_lods(None, |_, _| {}).unwrap();
/// assert!(outcome.is_installed());
/// assert_eq!(pipe.lods()[0].name, "Pipe_LOD[0]");
/// ```
#[derive(Debug)]
pub struct PipeBuilder {
    line: ControlLine,
    config: PipeConfig,
    lod_infos: Vec<LodInfo>,
    preview: PipeMesh,
    preview_triangles: usize,
    lods: Vec<PipeMesh>,
    mesh_builder: MeshBuilder,
}

fn preview_name(base: &str) -> String {
    format!("{base}_PreviewMesh")
}

impl PipeBuilder {
    /// Create a builder for `line`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::CircleDetailTooLow`] if the configured circle
    /// detail is below the minimum.
    pub fn new(line: ControlLine, mut config: PipeConfig) -> PipeResult<Self> {
        check_detail(config.mesh.circle_detail)?;
        config.lods.clamp_to(config.mesh.circle_detail);
        let mut builder = Self {
            preview: PipeMesh::new(preview_name(&config.name)),
            line,
            config,
            lod_infos: Vec::new(),
            preview_triangles: 0,
            lods: Vec::new(),
            mesh_builder: MeshBuilder::new(),
        };
        builder.refresh()?;
        Ok(builder)
    }

    /// Create a builder around the initial three-node line.
    ///
    /// # Errors
    ///
    /// See [`PipeBuilder::new`].
    pub fn with_default_line(config: PipeConfig) -> PipeResult<Self> {
        Self::new(ControlLine::new(LineDefaults::default()), config)
    }

    /// The control line.
    #[must_use]
    pub const fn line(&self) -> &ControlLine {
        &self.line
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &PipeConfig {
        &self.config
    }

    /// Edit the control line, then refresh forecasts and the preview.
    ///
    /// # Errors
    ///
    /// Any preview build failure.
    pub fn edit<R>(&mut self, edit: impl FnOnce(&mut ControlLine) -> R) -> PipeResult<R> {
        let result = edit(&mut self.line);
        self.refresh()?;
        Ok(result)
    }

    /// Insert a node if the line allows it, using the default turn radius.
    ///
    /// Returns whether the node was added.
    ///
    /// # Errors
    ///
    /// Any preview build failure.
    pub fn try_add_node(&mut self, index: usize, position: Point3<f64>, space: Space) -> PipeResult<bool> {
        let radius = self.line.defaults().turn.radius();
        if !self.line.is_add_allowed(&position, index, radius, space) {
            return Ok(false);
        }
        self.edit(|line| line.add_node(index, position, space))??;
        Ok(true)
    }

    /// Delete a node if the line allows it.
    ///
    /// Returns whether the node was deleted.
    ///
    /// # Errors
    ///
    /// Any preview build failure.
    pub fn try_delete_node(&mut self, index: usize) -> PipeResult<bool> {
        if !self.line.is_delete_allowed(index).is_allowed() {
            return Ok(false);
        }
        self.edit(|line| line.delete_node(index))??;
        Ok(true)
    }

    /// Move a node if the line allows it.
    ///
    /// Returns whether the node moved.
    ///
    /// # Errors
    ///
    /// Any preview build failure.
    pub fn try_move_node(&mut self, index: usize, position: Point3<f64>, space: Space) -> PipeResult<bool> {
        if !self.line.is_moving_allowed(index, &position, space) {
            return Ok(false);
        }
        self.edit(|line| line.move_node(index, position, space))??;
        Ok(true)
    }

    /// Replace the placement of the pipe.
    ///
    /// Meshes are built in local space, so nothing is rebuilt.
    pub fn set_transform(&mut self, transform: Transform3D) {
        self.line.set_transform(transform);
    }

    /// Place the pipe from translation, rotation and per-axis scale.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SingularScale`](pipe_geometry::GeometryError::SingularScale)
    /// for a zero or non-finite scale component.
    pub fn place(
        &mut self,
        translation: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        scale: Vector3<f64>,
    ) -> PipeResult<()> {
        self.set_transform(Transform3D::from_parts(translation, rotation, scale)?);
        Ok(())
    }

    /// Rename the pipe. Installed LODs keep their names until regenerated.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.config.name = name.into();
        self.preview.name = preview_name(&self.config.name);
    }

    /// Set the material.
    pub fn set_material(&mut self, material: impl Into<String>) {
        self.config.material = material.into();
    }

    /// Set the base circle detail, re-clamping the LOD settings.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::CircleDetailTooLow`] below the minimum; the
    /// builder is left unchanged.
    pub fn set_circle_detail(&mut self, circle_detail: u32) -> PipeResult<()> {
        check_detail(circle_detail)?;
        self.config.mesh.circle_detail = circle_detail;
        self.config.lods.clamp_to(circle_detail);
        self.refresh()
    }

    /// Choose which surfaces to generate.
    ///
    /// # Errors
    ///
    /// Any preview build failure.
    pub fn set_sides(&mut self, sides: MeshSides) -> PipeResult<()> {
        self.config.mesh.sides = sides;
        self.refresh()
    }

    /// Set the ring rotation in degrees.
    ///
    /// # Errors
    ///
    /// Any preview build failure.
    pub fn set_rotation(&mut self, degrees: f64) -> PipeResult<()> {
        self.config.mesh.rotation = degrees;
        self.refresh()
    }

    /// Set the UV layout.
    ///
    /// # Errors
    ///
    /// Any preview build failure.
    pub fn set_uv(&mut self, uv: UvProperties) -> PipeResult<()> {
        self.config.mesh.uv = uv;
        self.refresh()
    }

    /// Enable or disable preview rebuilds. Disabling drops the preview.
    ///
    /// # Errors
    ///
    /// Any preview build failure when enabling.
    pub fn set_preview(&mut self, preview: bool) -> PipeResult<()> {
        self.config.preview = preview;
        if preview {
            self.rebuild_preview()
        } else {
            self.preview.clear();
            Ok(())
        }
    }

    /// Set the LOD count, clamped to what the degrade step allows.
    pub fn set_lod_count(&mut self, count: u32) {
        self.config.lods.set_count(count, self.config.mesh.circle_detail);
        self.recalculate_lod_infos();
    }

    /// Set the LOD degrade step, clamped, then re-clamp the count.
    pub fn set_lod_degrade_step(&mut self, step: u32) {
        self.config.lods.set_degrade_step(step, self.config.mesh.circle_detail);
        self.recalculate_lod_infos();
    }

    /// Most LOD levels the current step allows.
    #[must_use]
    pub const fn max_lod_count(&self) -> u32 {
        self.config.lods.max_count(self.config.mesh.circle_detail)
    }

    /// Largest degrade step for the current circle detail.
    #[must_use]
    pub const fn max_degrade_step(&self) -> u32 {
        LodSettings::max_degrade_step(self.config.mesh.circle_detail)
    }

    /// Triangles a mesh of this pipe would have at `circle_detail`.
    #[must_use]
    pub fn forecast_triangles(&self, circle_detail: u32) -> usize {
        forecast_triangles(self.line.chord_count(), circle_detail, &self.config.mesh.sides)
    }

    /// Recompute the per-level detail and triangle forecasts.
    pub fn recalculate_lod_infos(&mut self) {
        self.lod_infos = self.config.lods.lod_infos(
            self.config.mesh.circle_detail,
            self.line.chord_count(),
            &self.config.mesh.sides,
        );
    }

    /// Detail and forecast of every LOD level, finest first.
    #[must_use]
    pub fn lod_infos(&self) -> &[LodInfo] {
        &self.lod_infos
    }

    /// Rebuild the preview mesh at the base circle detail.
    ///
    /// # Errors
    ///
    /// Any mesh build failure.
    pub fn rebuild_preview(&mut self) -> PipeResult<()> {
        self.mesh_builder
            .build_into(&self.line, &self.config.mesh, &mut self.preview)?;
        self.preview_triangles = self.forecast_triangles(self.config.mesh.circle_detail);
        Ok(())
    }

    /// The preview mesh; empty while previews are disabled.
    #[must_use]
    pub const fn preview(&self) -> &PipeMesh {
        &self.preview
    }

    /// Triangle forecast of the last preview build.
    #[must_use]
    pub const fn preview_triangles(&self) -> usize {
        self.preview_triangles
    }

    /// Build one mesh per LOD level, optionally save them, and install them.
    ///
    /// Levels are named `"{name}_LOD[{i}]"`. If the save is cancelled the
    /// installed LODs are kept and the new meshes are returned in
    /// [`LodGeneration::Cancelled`]; pass them to
    /// [`PipeBuilder::install_lods`] to keep them anyway.
    ///
    /// # Errors
    ///
    /// Any mesh build failure, or [`MeshError::Store`] if the store fails a
    /// write. The installed LODs are untouched on error.
    pub fn generate_lods(
        &mut self,
        target: Option<SaveTarget<'_>>,
        mut progress: impl FnMut(GenerationStage, f64),
    ) -> PipeResult<LodGeneration<PipeMesh>> {
        self.recalculate_lod_infos();
        let total = self.lod_infos.len();
        let mut generated = Vec::with_capacity(total);
        for (i, lod) in self.lod_infos.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            progress(GenerationStage::Building, i as f64 / total as f64);
            let params = self.config.mesh.with_circle_detail(lod.circle_detail);
            generated.push(
                self.mesh_builder
                    .build(&self.line, &params, lod_name(&self.config.name, i))?,
            );
        }

        info!(
            name = %self.config.name,
            lods = generated.len(),
            triangles = generated.iter().map(PipeMesh::triangle_count).sum::<usize>(),
            "Generated pipe LODs"
        );

        finish_generation(generated, target, &mut progress, &mut self.lods)
    }

    /// Replace the installed LODs.
    pub fn install_lods(&mut self, lods: Vec<PipeMesh>) {
        self.lods = lods;
    }

    /// Installed LOD meshes, finest first.
    #[must_use]
    pub fn lods(&self) -> &[PipeMesh] {
        &self.lods
    }

    /// Drop every installed LOD.
    pub fn clear_lods(&mut self) {
        self.lods.clear();
    }

    /// Screen-relative switch height of each installed LOD.
    #[must_use]
    pub fn transition_heights(&self) -> Vec<f64> {
        transition_heights(self.lods.len())
    }

    fn refresh(&mut self) -> PipeResult<()> {
        self.recalculate_lod_infos();
        if self.config.preview {
            self.rebuild_preview()?;
        }
        Ok(())
    }
}

fn check_detail(circle_detail: u32) -> PipeResult<()> {
    if circle_detail < MIN_CIRCLE_DETAIL {
        return Err(MeshError::CircleDetailTooLow {
            min: MIN_CIRCLE_DETAIL,
            actual: circle_detail,
        }
        .into());
    }
    Ok(())
}
