//! Error types for faqdesk.
//!
//! This module defines a unified error enum covering all error categories in
//! the workspace: configuration, I/O, record source, embedding, vector index,
//! snapshot, and prompt errors.

use thiserror::Error;

/// Unified error type for faqdesk.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic in library code; errors are represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external source of truth could not be reached or refused the
    /// operation (network, auth, quota). Recovered locally by falling back to
    /// the cache or reporting unavailability.
    #[error("Record source error: {0}")]
    Source(String),

    /// Embedding provider errors (request failure, malformed response)
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// An embedding's size disagrees with the established index
    /// dimensionality. Indicates a provider configuration change; the
    /// operation is aborted and an explicit full rebuild is required.
    #[error("Dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The vector index length diverged from the store length. Searches must
    /// force a refresh before serving further results.
    #[error("Store/index desync: {entries} entries vs {vectors} vectors")]
    IndexDesync { entries: usize, vectors: usize },

    /// Persisted snapshot files are unreadable or malformed. Treated as
    /// absent by the cache controller, triggering a rebuild from source.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Prompt assembly errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = AppError::DimensionMismatch {
            expected: 384,
            actual: 768,
        };
        let msg = err.to_string();
        assert!(msg.contains("384"));
        assert!(msg.contains("768"));
    }

    #[test]
    fn test_desync_message() {
        let err = AppError::IndexDesync {
            entries: 5,
            vectors: 4,
        };
        assert!(err.to_string().contains("5 entries vs 4 vectors"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
