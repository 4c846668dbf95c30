use thiserror::Error;

/// Shape and contract violations reported by the embedding and search layers.
///
/// Numeric degeneracies (empty input, zero span, zero-norm features) are not
/// errors; they resolve to well-defined fallback values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid k: {0} (must be zero or greater)")]
    InvalidK(i64),
}

pub type Result<T> = std::result::Result<T, Error>;
