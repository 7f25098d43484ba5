//! Procedural pipe building: edit a control line, preview the pipe, and
//! generate, save and combine its LOD meshes.
//!
//! This umbrella crate re-exports the pipe crates and adds the two
//! orchestrators that tie them together.
//!
//! # Quick Start
//!
//! ```
//! use pipe_builder::prelude::*;
//! use std::path::Path;
//!
//! let config = PipeConfig::default()
//!     .with_name("Drain")
//!     .with_circle_detail(12)
//!     .with_lods(3, 4);
//! let mut pipe = PipeBuilder::with_default_line(config).unwrap();
//!
//! // Extend the line if the new corner keeps it valid
//! pipe.try_add_node(3, Point3::new(0.0, 0.0, 10.0), Space::Local).unwrap();
//!
//! // Build the LODs and save them
//! let mut store = MemoryStore::new();
//! let mut prompt = |_: &Path| OverwriteAnswer::YesToAll;
//! let target = SaveTarget::new(&mut store, &mut prompt, Path::new("Assets/Pipes"));
//! let outcome = pipe.generate_lods(Some(target), |_, _| {}).unwrap();
//!
//! assert!(outcome.is_installed());
//! assert_eq!(store.len(), 3);
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`geometry`] - Angles, frames, closest-point helpers and `Transform3D`
//! - [`line`] - `ControlLine` editing, filleted corners and chord tessellation
//!
//! ## Meshes
//! - [`mesh`] - `MeshBuilder`, UV layout, combine, LOD policy and asset saving
//!
//! ## Orchestration
//! - [`PipeBuilder`] - One pipe: line, config, preview and LODs
//! - [`PipeMeshCombiner`] - Several pipes stitched per LOD level
//!
//! # Feature Flags
//!
//! - `serde` - Enable serialization/deserialization across all pipe crates

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

mod builder;
mod combiner;
mod config;
mod error;
mod generation;

pub use builder::PipeBuilder;
pub use combiner::PipeMeshCombiner;
pub use config::PipeConfig;
pub use error::{PipeError, PipeResult};
pub use generation::{GenerationStage, LodGeneration, SaveTarget};

// =============================================================================
// Re-exports
// =============================================================================

/// Angles, frames, closest-point helpers and transforms.
pub use pipe_geometry as geometry;

/// Control line editing and chord tessellation.
pub use control_line as line;

/// Mesh building, UV layout, combine, LOD policy and asset saving.
pub use pipe_mesh as mesh;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for building pipes.
///
/// # Usage
///
/// ```
/// use pipe_builder::prelude::*;
/// ```
pub mod prelude {
    // Orchestrators
    pub use crate::{
        GenerationStage, LodGeneration, PipeBuilder, PipeConfig, PipeError, PipeMeshCombiner,
        PipeResult, SaveTarget,
    };

    // Geometry
    pub use pipe_geometry::{Point3, Transform3D, UnitQuaternion, Vector3};

    // Line
    pub use control_line::{ControlLine, LineDefaults, LineSettings, RadiusSettings, Setting, Space, TurnSettings};

    // Mesh
    pub use pipe_mesh::{
        MemoryStore, MeshBuildParams, MeshSides, OverwriteAnswer, PipeMesh, SaveOutcome, UvProperties,
    };
}

// =============================================================================
// Tests
// =============================================================================
