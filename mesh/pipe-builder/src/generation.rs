//! LOD batch outcomes shared by the builder and the combiner.

use std::path::Path;

use pipe_mesh::{AssetStore, OverwritePrompt, PipeMesh, SaveOutcome, SaveStage, save_meshes};
use tracing::warn;

use crate::error::PipeResult;

/// Where a generated LOD batch is saved.
pub struct SaveTarget<'a> {
    /// Asset storage.
    pub store: &'a mut dyn AssetStore,
    /// Answers overwrite questions for existing assets.
    pub prompt: &'a mut dyn OverwritePrompt,
    /// Folder the assets go into.
    pub folder: &'a Path,
}

impl<'a> SaveTarget<'a> {
    /// Create a save target.
    pub fn new(store: &'a mut dyn AssetStore, prompt: &'a mut dyn OverwritePrompt, folder: &'a Path) -> Self {
        Self { store, prompt, folder }
    }
}

impl std::fmt::Debug for SaveTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveTarget").field("folder", &self.folder).finish_non_exhaustive()
    }
}

/// Phase of a LOD batch, reported with progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// Building meshes.
    Building,
    /// Saving the built meshes.
    Saving(SaveStage),
}

/// How a LOD batch ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LodGeneration<T> {
    /// The batch replaced the installed LODs.
    Installed {
        /// Number of installed levels.
        count: usize,
        /// Save result, if a target was given.
        save: Option<SaveOutcome>,
    },
    /// The user cancelled the save. The installed LODs are untouched; the
    /// generated meshes are handed back to keep or drop.
    Cancelled {
        /// Meshes built by this batch.
        lods: Vec<T>,
    },
}

impl<T> LodGeneration<T> {
    /// Whether the batch replaced the installed LODs.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Save `generated` if asked, then install it into `installed` unless the
/// save was cancelled.
pub(crate) fn finish_generation<T: AsRef<PipeMesh>>(
    generated: Vec<T>,
    target: Option<SaveTarget<'_>>,
    progress: &mut impl FnMut(GenerationStage, f64),
    installed: &mut Vec<T>,
) -> PipeResult<LodGeneration<T>> {
    let save = match target {
        Some(target) => {
            let outcome = save_meshes(target.store, target.prompt, target.folder, &generated, |stage, fraction| {
                progress(GenerationStage::Saving(stage), fraction);
            })?;
            if outcome == SaveOutcome::Cancelled {
                warn!(lods = generated.len(), "LOD save cancelled; keeping previous LODs");
                return Ok(LodGeneration::Cancelled { lods: generated });
            }
            Some(outcome)
        }
        None => None,
    };

    let count = generated.len();
    *installed = generated;
    Ok(LodGeneration::Installed { count, save })
}
