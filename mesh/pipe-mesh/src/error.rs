//! Error types for pipe mesh operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, combining or saving pipe meshes.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Circle detail below the minimum polygon.
    #[error("circle detail {actual} is below the minimum of {min}")]
    CircleDetailTooLow {
        /// Minimum circle detail.
        min: u32,
        /// Requested circle detail.
        actual: u32,
    },

    /// Not enough chord samples to sweep a wall.
    #[error("need at least {min} chord samples, got {actual}")]
    TooFewChords {
        /// Minimum required samples.
        min: usize,
        /// Actual sample count.
        actual: usize,
    },

    /// The mesh has more vertices than 32-bit indices can address.
    #[error("mesh with {0} vertices exceeds the 32-bit index range")]
    TooManyVertices(usize),

    /// Combine was called without any source meshes.
    #[error("no meshes to combine")]
    NothingToCombine,

    /// Sources passed to a batch combine carry different LOD counts.
    #[error("LOD count mismatch: expected {expected}, found {found}")]
    LodCountMismatch {
        /// LOD count of the first source.
        expected: usize,
        /// LOD count of the offending source.
        found: usize,
    },

    /// The asset store failed to write a mesh.
    #[error("failed to store mesh at {path}")]
    Store {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl MeshError {
    /// Whether this error came from the asset store.
    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(self, Self::Store { .. })
    }
}

/// Result type for pipe mesh operations.
pub type MeshResult<T> = std::result::Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::CircleDetailTooLow { min: 3, actual: 2 };
        assert_eq!(format!("{err}"), "circle detail 2 is below the minimum of 3");

        let err = MeshError::LodCountMismatch { expected: 3, found: 2 };
        assert_eq!(format!("{err}"), "LOD count mismatch: expected 3, found 2");
    }

    #[test]
    fn test_store_error_source() {
        let err = MeshError::Store {
            path: PathBuf::from("out/pipe.asset"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.is_store_error());
        assert!(std::error::Error::source(&err).is_some());
        assert!(!MeshError::NothingToCombine.is_store_error());
    }
}
