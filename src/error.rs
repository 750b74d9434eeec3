//! Error types for espgpt.
//!
//! Every fallible operation in the library returns [`Result`]. Errors are
//! plain values so the HTTP layer can map them to status codes without
//! knowing anything about matching or caching.

use thiserror::Error;

use crate::providers::RemoteError;

/// Top-level error type for the espgpt library.
#[derive(Debug, Error)]
pub enum EspGptError {
    /// `best_match` was called on a matcher with no entries.
    #[error("knowledge base is empty")]
    EmptyKnowledgeBase,

    /// Invalid knowledge entry data (bad importance, bad index).
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// The remote completion call failed. Surfaced unchanged.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Configuration could not be loaded or failed validation.
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EspGptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_knowledge_base_display() {
        assert_eq!(
            EspGptError::EmptyKnowledgeBase.to_string(),
            "knowledge base is empty"
        );
    }

    #[test]
    fn test_remote_error_is_transparent() {
        let err = EspGptError::from(RemoteError::Timeout);
        assert_eq!(err.to_string(), RemoteError::Timeout.to_string());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EspGptError = io.into();
        assert!(matches!(err, EspGptError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
