//! Error types for control-line operations.

use thiserror::Error;

/// Result type for control-line operations.
pub type LineResult<T> = Result<T, LineError>;

/// Errors raised by control-line mutators.
///
/// Geometric validity (minimum angle, overlapping fillets) is never an error;
/// it is reported by the `is_*_allowed` predicates before mutating.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineError {
    /// A line needs more control nodes than were supplied or would remain.
    #[error("control line needs at least {min} nodes, got {actual}")]
    TooFewNodes {
        /// Minimum required nodes.
        min: usize,
        /// Actual node count.
        actual: usize,
    },

    /// A node index is outside the valid range for the operation.
    #[error("node index {index} out of range for {len} nodes")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current node count.
        len: usize,
    },
}

impl LineError {
    /// Create an index-out-of-range error.
    #[must_use]
    pub const fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Whether this error reports a bad node index.
    #[must_use]
    pub const fn is_index_error(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}
