//! Pipe mesh generation.
//!
//! This crate sweeps a polygonal cross-section along the chord samples of a
//! [`ControlLine`](control_line::ControlLine) and hands the result to a
//! [`MeshSink`]:
//!
//! - **Walls**: an outer wall facing out and an inner wall facing the spine,
//!   each a quad strip between consecutive rings
//! - **End caps**: annuli from the inner to the outer radius at both ends
//! - **UVs**: U along the arc length, V around the ring, with per-side tiling,
//!   offset, automatic length tiling and a texture-atlas helper
//! - **Combine**: merge placed meshes into one with a submesh per material
//! - **LOD policy**: clamp LOD count and degrade step, forecast triangle counts
//! - **Persistence boundary**: save named meshes through a host [`AssetStore`]
//!
//! # Example
//!
//! ```
//! use control_line::{ControlLine, LineDefaults};
//! use pipe_mesh::{MeshBuildParams, MeshBuilder, MeshSides, forecast_triangles};
//!
//! let line = ControlLine::new(LineDefaults::default());
//! let params = MeshBuildParams::default().with_circle_detail(8);
//!
//! let mut builder = MeshBuilder::new();
//! let mesh = builder.build(&line, &params, "pipe").unwrap();
//!
//! assert_eq!(
//!     mesh.triangle_count(),
//!     forecast_triangles(line.chord_count(), 8, &MeshSides::default()),
//! );
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for meshes and parameters

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::similar_names,
    clippy::suboptimal_flops,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

mod builder;
mod combine;
mod error;
mod lod;
mod mesh;
mod params;
mod persist;
mod uv;

pub use builder::{MIN_CHORDS, MeshBuilder};
pub use combine::{CombineSource, CombinedMesh, combine_into, combine_meshes};
pub use error::{MeshError, MeshResult};
pub use lod::{LodInfo, LodSettings, forecast_indices, forecast_triangles, lod_name, transition_heights};
pub use mesh::{Bounds, MeshSink, PipeMesh};
pub use params::{MIN_CIRCLE_DETAIL, MeshBuildParams, MeshSides};
pub use persist::{
    ASSET_EXTENSION, AssetStore, MemoryStore, OverwriteAnswer, OverwritePrompt, SaveOutcome,
    SaveStage, asset_path, save_meshes,
};
pub use uv::{EdgeUv, SideUv, TextureAtlas, UvProperties, apply_tiling_and_offset};
