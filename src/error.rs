//! Error types for the embedding store

use thiserror::Error;

/// Result type alias for store, search, and embedding operations
pub type Result<T> = std::result::Result<T, EmbeddingDbError>;

/// Error types that can occur in embedding store operations
#[derive(Error, Debug)]
pub enum EmbeddingDbError {
    #[error("Invalid dimension: {dim} (must be greater than zero)")]
    InvalidDimension { dim: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Label not found: {label}")]
    NotFound { label: String },

    #[error("Cannot compute cosine similarity with a zero vector")]
    ZeroVector,

    #[error("Invalid vector: {reason}")]
    InvalidVector { reason: String },

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EmbeddingDbError {
    /// Whether the caller can reasonably retry with different input.
    ///
    /// Only a bad store dimension is a construction-time misconfiguration.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, EmbeddingDbError::InvalidDimension { .. })
    }
}

impl From<reqwest::Error> for EmbeddingDbError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingDbError::Embedding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EmbeddingDbError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");

        let err = EmbeddingDbError::NotFound {
            label: "banana".to_string(),
        };
        assert_eq!(err.to_string(), "Label not found: banana");
    }

    #[test]
    fn test_recoverable() {
        assert!(!EmbeddingDbError::InvalidDimension { dim: 0 }.is_recoverable());
        assert!(EmbeddingDbError::ZeroVector.is_recoverable());
        assert!(EmbeddingDbError::NotFound {
            label: "x".to_string()
        }
        .is_recoverable());
    }
}
