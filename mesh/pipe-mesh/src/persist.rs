//! Saving generated meshes through a host asset store.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{MeshError, MeshResult};
use crate::mesh::PipeMesh;

/// Extension of stored mesh assets.
pub const ASSET_EXTENSION: &str = "asset";

/// Durable storage for mesh assets, provided by the host.
pub trait AssetStore {
    /// Whether this host can persist assets at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether an asset already exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Persist `mesh` at `path`, replacing any existing asset.
    ///
    /// # Errors
    ///
    /// Any I/O failure of the underlying storage.
    fn write(&mut self, path: &Path, mesh: &PipeMesh) -> io::Result<()>;
}

/// An [`AssetStore`] that keeps assets in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    assets: BTreeMap<PathBuf, PipeMesh>,
    unavailable: bool,
}

impl MemoryStore {
    /// Create an empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that reports it cannot persist anything.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// The asset stored at `path`.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&PipeMesh> {
        self.assets.get(path)
    }

    /// Number of stored assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Paths of stored assets in order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.assets.keys().map(PathBuf::as_path)
    }
}

impl AssetStore for MemoryStore {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn exists(&self, path: &Path) -> bool {
        self.assets.contains_key(path)
    }

    fn write(&mut self, path: &Path, mesh: &PipeMesh) -> io::Result<()> {
        self.assets.insert(path.to_path_buf(), mesh.clone());
        Ok(())
    }
}

/// Answer to an overwrite prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteAnswer {
    /// Overwrite this asset.
    Yes,
    /// Overwrite this and every later existing asset without asking.
    YesToAll,
    /// Abandon the whole save.
    Cancel,
}

/// Asks whether an existing asset may be replaced.
pub trait OverwritePrompt {
    /// Answer for the asset at `path`.
    fn confirm_overwrite(&mut self, path: &Path) -> OverwriteAnswer;
}

impl<F: FnMut(&Path) -> OverwriteAnswer> OverwritePrompt for F {
    fn confirm_overwrite(&mut self, path: &Path) -> OverwriteAnswer {
        self(path)
    }
}

/// Phase of a save batch, reported with progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStage {
    /// Looking for existing assets and asking about them.
    Checking,
    /// Writing assets.
    Writing,
}

/// How a save batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Every mesh was written.
    Saved {
        /// Number of assets written.
        count: usize,
    },
    /// The host cannot persist assets; nothing was written.
    NotApplicable,
    /// The user declined an overwrite; nothing was written.
    Cancelled,
}

impl SaveOutcome {
    /// Whether the batch completed.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Storage path of the asset named `name` in `folder`.
#[must_use]
pub fn asset_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{name}.{ASSET_EXTENSION}"))
}

/// Save `meshes` into `folder`, one asset per mesh named after it.
///
/// Every existing asset is confirmed through `prompt` before the first
/// write, so a cancel leaves the store untouched. `progress` receives the
/// stage and the fraction of meshes handled in it.
///
/// # Errors
///
/// [`MeshError::Store`] if the store fails a write. Assets written before
/// the failure stay written.
pub fn save_meshes<S, P, M>(
    store: &mut S,
    prompt: &mut P,
    folder: &Path,
    meshes: &[M],
    mut progress: impl FnMut(SaveStage, f64),
) -> MeshResult<SaveOutcome>
where
    S: AssetStore + ?Sized,
    P: OverwritePrompt + ?Sized,
    M: AsRef<PipeMesh>,
{
    if !store.is_available() {
        return Ok(SaveOutcome::NotApplicable);
    }

    #[allow(clippy::cast_precision_loss)]
    let fraction = |i: usize| i as f64 / meshes.len() as f64;

    let paths: Vec<PathBuf> = meshes
        .iter()
        .map(|mesh| asset_path(folder, &mesh.as_ref().name))
        .collect();
    let mut overwrite_all = false;
    for (i, path) in paths.iter().enumerate() {
        progress(SaveStage::Checking, fraction(i));
        if overwrite_all || !store.exists(path) {
            continue;
        }
        match prompt.confirm_overwrite(path) {
            OverwriteAnswer::Yes => {}
            OverwriteAnswer::YesToAll => overwrite_all = true,
            OverwriteAnswer::Cancel => {
                warn!(path = %path.display(), "Mesh save cancelled");
                return Ok(SaveOutcome::Cancelled);
            }
        }
    }

    for (i, (mesh, path)) in meshes.iter().zip(&paths).enumerate() {
        progress(SaveStage::Writing, fraction(i));
        store.write(path, mesh.as_ref()).map_err(|source| {
            warn!(path = %path.display(), error = %source, "Mesh save failed");
            MeshError::Store {
                path: path.clone(),
                source,
            }
        })?;
    }
    progress(SaveStage::Writing, 1.0);

    info!(count = meshes.len(), folder = %folder.display(), "Saved pipe meshes");
    Ok(SaveOutcome::Saved { count: meshes.len() })
}
