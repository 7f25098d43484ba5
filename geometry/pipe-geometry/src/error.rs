//! Error types for pipe geometry.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors that can occur while constructing geometric primitives.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// A transform scale component is zero or not finite, so the transform cannot be inverted.
    #[error("transform scale must be finite and non-zero on every axis, got ({x}, {y}, {z})")]
    SingularScale {
        /// Scale along X.
        x: f64,
        /// Scale along Y.
        y: f64,
        /// Scale along Z.
        z: f64,
    },
}
