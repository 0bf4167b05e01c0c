//! Error types for Docent.
//!
//! This module defines a unified error enum covering all failure categories
//! in the application: configuration, I/O, answer/query generation,
//! retrieval, prompt rendering and serialization.

use thiserror::Error;

/// Unified error type for Docent.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Language-model call failed during query or answer generation.
    ///
    /// Fatal for the current chain run; no partial response is produced.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Search-service call failed during document retrieval.
    ///
    /// Same fatal, no-partial-result policy as generation failures.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Prompt template rendering errors
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
    fn test_error_display() {
        let err = AppError::Generation("model unavailable".to_string());
        assert_eq!(err.to_string(), "Generation error: model unavailable");

        let err = AppError::Retrieval("index not found".to_string());
        assert_eq!(err.to_string(), "Retrieval error: index not found");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
