//! Editable pipe spines.
//!
//! A [`ControlLine`] is an ordered chain of [`ControlNode`]s. Every interior
//! node that is not straight becomes a filleted corner: a circular arc of the
//! node's turn radius, tangent to both adjacent edges. The line keeps the
//! derived corner data current on every edit and tessellates the filleted
//! polyline into oriented [`ChordNode`] samples that a mesh builder sweeps a
//! cross-section along.
//!
//! # Editing
//!
//! Edits come in pairs: a predicate that reports whether the edit keeps the
//! line valid, and a mutator that commits it.
//!
//! | Predicate | Mutator |
//! |-----------|---------|
//! | [`ControlLine::is_add_allowed`] | [`ControlLine::add_node`] |
//! | [`ControlLine::is_delete_allowed`] | [`ControlLine::delete_node`] |
//! | [`ControlLine::is_moving_allowed`] | [`ControlLine::move_node`] |
//! | [`ControlLine::is_turn_radius_allowed_for_node`] | [`ControlLine::set_node_turn`] |
//! | [`ControlLine::is_new_default_turn_radius_allowed`] | [`ControlLine::set_default_turn`] |
//!
//! A line is valid when no corner is sharper than
//! [`LineSettings::min_allowed_angle`] (if angle checking is on) and no two
//! adjacent fillets overlap along the edge between them.
//!
//! # Example
//!
//! ```
//! use control_line::{ControlLine, LineDefaults, Space};
//! use nalgebra::Point3;
//!
//! let mut line = ControlLine::new(LineDefaults::default());
//! assert_eq!(line.len(), 3);
//!
//! let target = Point3::new(0.0, 0.0, 8.0);
//! if line.is_moving_allowed(2, &target, Space::Local) {
//!     line.move_node(2, target, Space::Local).unwrap();
//! }
//!
//! // One sample per endpoint plus five along the fillet.
//! assert_eq!(line.chord_count(), 7);
//! ```
//!
//! # Coordinate Spaces
//!
//! Node positions are stored in the line's local space. Positions passed to
//! predicates and mutators are tagged with a [`Space`]; world positions go
//! through the inverse of the line transform. All angles, paddings and chord
//! samples are computed in local space.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for lines and settings

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::similar_names,
    clippy::suboptimal_flops,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation
)]

mod chord;
mod error;
mod line;
mod node;
mod picking;
mod settings;
mod validation;

pub use error::{LineError, LineResult};
pub use line::{ControlLine, MIN_NODES, Space};
pub use node::{ChordNode, ControlNode};
pub use picking::{LinePick, PickRay};
pub use settings::{
    LineDefaults, LineSettings, MIN_INNER_RADIUS, MIN_TURN_DETAIL, RadiusSettings,
    SINGLE_SAMPLE_TURN_RADIUS, Setting, TurnSettings,
};
pub use validation::DeleteCheck;
