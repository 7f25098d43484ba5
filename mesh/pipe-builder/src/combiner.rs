//! Stitching the LODs of several pipes into shared per-level meshes.

use pipe_geometry::Transform3D;
use pipe_mesh::{CombineSource, CombinedMesh, MeshError, combine_meshes, lod_name, transition_heights};
use tracing::info;

use crate::builder::PipeBuilder;
use crate::error::PipeResult;
use crate::generation::{GenerationStage, LodGeneration, SaveTarget, finish_generation};

/// Combines the installed LODs of several [`PipeBuilder`]s: level `i` of
/// every pipe goes into one mesh, with a submesh per distinct material.
#[derive(Debug, Clone)]
pub struct PipeMeshCombiner {
    name: String,
    transform: Transform3D,
    lods: Vec<CombinedMesh<String>>,
}

impl PipeMeshCombiner {
    /// Create a combiner whose meshes live in the space of `transform`.
    pub fn new(name: impl Into<String>, transform: Transform3D) -> Self {
        Self {
            name: name.into(),
            transform,
            lods: Vec::new(),
        }
    }

    /// Base name of combined meshes.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Placement of the combined meshes.
    #[must_use]
    pub const fn transform(&self) -> &Transform3D {
        &self.transform
    }

    /// Replace the placement. Installed LODs keep the space they were built in.
    pub fn set_transform(&mut self, transform: Transform3D) {
        self.transform = transform;
    }

    /// Whether `builders` can be combined: at least one, all with the same
    /// non-zero number of installed LODs.
    #[must_use]
    pub fn can_build(builders: &[&PipeBuilder]) -> bool {
        match builders.split_first() {
            Some((first, rest)) => {
                let count = first.lods().len();
                count > 0 && rest.iter().all(|b| b.lods().len() == count)
            }
            None => false,
        }
    }

    /// Combine level `i` of every builder for each LOD level, optionally
    /// save the results, and install them.
    ///
    /// Levels are named `"{name}_LOD[{i}]"`. Each pipe keeps its own
    /// placement and material. A cancelled save behaves as in
    /// [`PipeBuilder::generate_lods`].
    ///
    /// # Errors
    ///
    /// - [`MeshError::NothingToCombine`] if `builders` is empty or has no LODs
    /// - [`MeshError::LodCountMismatch`] if LOD counts differ
    /// - any combine or store failure
    pub fn build_combined_lods(
        &mut self,
        builders: &[&PipeBuilder],
        target: Option<SaveTarget<'_>>,
        mut progress: impl FnMut(GenerationStage, f64),
    ) -> PipeResult<LodGeneration<CombinedMesh<String>>> {
        let count = builders.first().map_or(0, |b| b.lods().len());
        if count == 0 {
            return Err(MeshError::NothingToCombine.into());
        }
        if let Some(other) = builders.iter().find(|b| b.lods().len() != count) {
            return Err(MeshError::LodCountMismatch {
                expected: count,
                found: other.lods().len(),
            }
            .into());
        }

        let mut generated = Vec::with_capacity(count);
        for level in 0..count {
            #[allow(clippy::cast_precision_loss)]
            progress(GenerationStage::Building, level as f64 / count as f64);
            let sources: Vec<CombineSource<'_, String>> = builders
                .iter()
                .map(|b| CombineSource::new(&b.lods()[level], *b.line().transform(), b.config().material.clone()))
                .collect();
            generated.push(combine_meshes(lod_name(&self.name, level), &self.transform, &sources)?);
        }

        info!(
            name = %self.name,
            pipes = builders.len(),
            lods = count,
            "Combined pipe LODs"
        );

        finish_generation(generated, target, &mut progress, &mut self.lods)
    }

    /// Replace the installed LODs.
    pub fn install_lods(&mut self, lods: Vec<CombinedMesh<String>>) {
        self.lods = lods;
    }

    /// Installed combined LODs, finest first.
    #[must_use]
    pub fn lods(&self) -> &[CombinedMesh<String>] {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipeConfig;
    use crate::error::PipeError;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn pipe_with_lods(material: &str, offset: f64, lods: u32) -> PipeBuilder {
        let config = PipeConfig::default()
            .with_circle_detail(9)
            .with_lods(lods, 3)
            .with_material(material);
        let mut pipe = PipeBuilder::with_default_line(config).unwrap();
        pipe.set_transform(Transform3D::from_translation(Vector3::new(offset, 0.0, 0.0)));
        let _ = pipe.generate_lods(None, |_, _| {}).unwrap();
        pipe
    }

    #[test]
    fn can_build_requires_matching_lods() {
        let a = pipe_with_lods("steel", 0.0, 2);
        let b = pipe_with_lods("steel", 5.0, 2);
        let c = pipe_with_lods("steel", 5.0, 3);
        let mut empty = pipe_with_lods("steel", 0.0, 1);
        empty.clear_lods();

        assert!(PipeMeshCombiner::can_build(&[&a, &b]));
        assert!(!PipeMeshCombiner::can_build(&[&a, &c]));
        assert!(!PipeMeshCombiner::can_build(&[&empty]));
        assert!(!PipeMeshCombiner::can_build(&[]));
    }

    #[test]
    fn combines_each_level() {
        let a = pipe_with_lods("steel", 0.0, 2);
        let b = pipe_with_lods("copper", 5.0, 2);
        let mut combiner = PipeMeshCombiner::new("Rack", Transform3D::identity());

        let outcome = combiner.build_combined_lods(&[&a, &b], None, |_, _| {}).unwrap();
        assert_eq!(outcome, LodGeneration::Installed { count: 2, save: None });

        for (level, combined) in combiner.lods().iter().enumerate() {
            assert_eq!(combined.mesh.name, format!("Rack_LOD[{level}]"));
            assert_eq!(combined.materials, vec!["steel".to_string(), "copper".to_string()]);
            let expected = a.lods()[level].triangle_count() + b.lods()[level].triangle_count();
            assert_eq!(combined.mesh.triangle_count(), expected);
        }

        // The second pipe's first vertex lands where its transform put it.
        let offset = a.lods()[0].vertex_count();
        let local = b.lods()[0].vertices[0];
        assert_relative_eq!(
            combiner.lods()[0].mesh.vertices[offset],
            local + Vector3::new(5.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_eq!(combiner.transition_heights().len(), 2);
    }

    #[test]
    fn mismatched_lods_rejected() {
        let a = pipe_with_lods("steel", 0.0, 2);
        let c = pipe_with_lods("steel", 0.0, 3);
        let mut combiner = PipeMeshCombiner::new("Rack", Transform3D::identity());
        let err = combiner.build_combined_lods(&[&a, &c], None, |_, _| {}).unwrap_err();
        assert!(matches!(
            err,
            PipeError::Mesh(MeshError::LodCountMismatch { expected: 2, found: 3 })
        ));
        assert!(combiner.lods().is_empty());
    }

    #[test]
    fn nothing_to_combine() {
        let mut combiner = PipeMeshCombiner::new("Rack", Transform3D::identity());
        let err = combiner.build_combined_lods(&[], None, |_, _| {}).unwrap_err();
        assert!(matches!(err, PipeError::Mesh(MeshError::NothingToCombine)));
    }
}
