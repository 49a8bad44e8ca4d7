//! Error types for mass-nn

use thiserror::Error;

/// Result type alias for mass-nn operations
pub type Result<T> = std::result::Result<T, MassError>;

/// Failures reported by a [`TransformEngine`](crate::core::transform::TransformEngine).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The engine cannot transform a buffer of this length
    #[error("unsupported transform length {len}")]
    UnsupportedLength {
        /// Requested length
        len: usize,
    },

    /// Output buffer does not match the input length
    #[error("transform length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length the engine was planned for
        expected: usize,
        /// Length it was handed
        actual: usize,
    },

    /// Any other engine-internal failure
    #[error("transform engine failure: {0}")]
    Engine(String),
}

/// Error types that can occur in mass-nn
#[derive(Debug, Error)]
pub enum MassError {
    /// Sequences violate `n >= m >= 1` or contain non-finite values
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The DFT engine failed; fatal for the invocation
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Nearest-neighbor selection on a profile with no entries
    #[error("Distance profile is empty")]
    EmptyProfile,

    /// Every profile entry is a non-competing sentinel
    #[error("No window is comparable to the query (all {len} entries are undefined)")]
    NoComparableWindow {
        /// Profile length
        len: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token in a sequence source is not a number
    #[error("Parse error in {source_name} at line {line}: {token:?} is not a number")]
    Parse {
        /// File name or other label for the source
        source_name: String,
        /// 1-based line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}
