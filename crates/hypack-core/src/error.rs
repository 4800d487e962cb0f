//! Error types shared across the hypack crates.

use thiserror::Error;

/// Upper bound on redraws for any random rejection loop.
///
/// Undersized draws are vanishingly rare, so hitting this cap means the inputs
/// are degenerate rather than unlucky.
pub const MAX_RETRIES: usize = 10_000;

/// Errors raised by sampling, stepping and packing operations.
#[derive(Debug, Error)]
pub enum SpackError {
    /// Vector dimension below the supported minimum.
    #[error("invalid dimension {dimension}: must be at least 1")]
    InvalidDimension { dimension: usize },

    /// Packing needs at least two points to have any pairs.
    #[error("need at least 2 points to pack, got {count}")]
    TooFewPoints { count: usize },

    /// A tangent basis was requested at a zero (or non-finite) vector.
    #[error("cannot build a tangent basis at a zero or non-finite vector (norm {norm})")]
    ZeroVector { norm: f64 },

    /// Two vectors that must share a dimension do not.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A hyperparameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A point index does not exist in the current configuration.
    #[error("point index {index} out of range (n={len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A bounded rejection loop ran out of attempts.
    #[error("gave up after {attempts} attempts while {context}")]
    RetryExhausted {
        context: &'static str,
        attempts: usize,
    },

    /// Writing observer output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpackError {
    /// Shorthand for [`SpackError::InvalidParameter`].
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        SpackError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout hypack.
pub type Result<T> = std::result::Result<T, SpackError>;
