//! Geometry utilities for pipe spines.
//!
//! This crate holds the small, pure building blocks used by the control-line
//! model and the chord tessellator:
//!
//! - [`angle_between`] - Unsigned angle at a vertex, in degrees
//! - [`calculate_padding`] - Edge length consumed by a fillet of a given radius
//! - [`closest_points_on_two_lines`] - Closest points between two infinite lines
//! - [`is_point_between`] - Point-on-segment test for collinear points
//! - [`most_codirectional`] - Pick the candidate (or its negation) best aligned with a reference
//! - [`Frame`] - Orthonormal forward/up/right frame
//! - [`Transform3D`] - Position/rotation/scale transform used for local↔world conversion
//!
//! # Angles
//!
//! Angles in the public API are in **degrees**. `180°` means the three points
//! are collinear with the vertex between the other two.
//!
//! # Example
//!
//! ```
//! use pipe_geometry::{angle_between, calculate_padding};
//! use nalgebra::Point3;
//!
//! let angle = angle_between(
//!     &Point3::new(0.0, 0.0, 0.0),
//!     &Point3::new(0.0, 0.0, 5.0),
//!     &Point3::new(5.0, 0.0, 5.0),
//! );
//! assert!((angle - 90.0).abs() < 1e-9);
//!
//! // A right-angle fillet of radius 1 consumes 1 unit along each edge.
//! assert!((calculate_padding(angle, 1.0) - 1.0).abs() < 1e-9);
//! ```
//!
//! # Coordinate System
//!
//! Right-handed. A [`Frame`] stores `right`, `up` and `forward` so that
//! `right × up = forward`.
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for frames and transforms

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::suboptimal_flops,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

mod angle;
mod direction;
mod error;
mod frame;
mod lines;
mod transform;

pub use angle::{
    FLAT_ANGLE_TOLERANCE, STRAIGHT_ANGLE, STRAIGHT_ANGLE_TOLERANCE, angle_between,
    calculate_padding, is_nearly_flat, is_straight, turn_arc_center_distance,
};
pub use direction::{find_perpendicular, most_codirectional};
pub use error::{GeometryError, GeometryResult};
pub use frame::Frame;
pub use lines::{closest_point_on_segment, closest_points_on_two_lines, is_point_between};
pub use transform::Transform3D;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
