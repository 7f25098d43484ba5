//! Error types for the pipe builder.

use control_line::LineError;
use pipe_geometry::GeometryError;
use pipe_mesh::MeshError;
use thiserror::Error;

/// Result type for pipe builder operations.
pub type PipeResult<T> = Result<T, PipeError>;

/// Errors raised while editing, building or combining pipes.
#[derive(Debug, Error)]
pub enum PipeError {
    /// Invalid placement transform.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A control-line mutator rejected its arguments.
    #[error(transparent)]
    Line(#[from] LineError),

    /// Mesh building, combining or saving failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_inner_errors_transparently() {
        let err: PipeError = LineError::index(7, 3).into();
        assert!(matches!(err, PipeError::Line(ref e) if e.is_index_error()));
        assert_eq!(err.to_string(), "node index 7 out of range for 3 nodes");

        let err: PipeError = MeshError::NothingToCombine.into();
        assert_eq!(err.to_string(), "no meshes to combine");
    }
}
