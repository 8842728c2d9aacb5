use thiserror::Error;

/// Errors raised while locating features
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    /// No documents or no vocabulary terms to work with.
    /// Not fatal: the orchestrator turns it into an empty result.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// The SVD cannot run on the term-document matrix
    #[error("Decomposition failed on a {rows}x{cols} matrix: {reason}")]
    Decomposition {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },

    /// The truncated singular value matrix has a numerically zero diagonal entry
    #[error("Singular value matrix is not invertible at k={k} (zero singular value at {index})")]
    SingularMatrix { k: usize, index: usize },

    /// Rejected by `LsiConfig::validate`
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl LocationError {
    #[inline]
    pub fn is_empty_input(&self) -> bool {
        matches!(self, LocationError::EmptyInput(_))
    }
}

pub type LocationResult<T> = Result<T, LocationError>;
