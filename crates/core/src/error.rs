//! Error types for the lore CLI.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, document extraction, the Cohere
//! capabilities, prompt rendering, and the persistent index.

use thiserror::Error;

/// Unified error type for the lore CLI.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// Errors are represented and propagated, never panicked on.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source document could not be read or parsed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Embeddings API errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Generation API errors
    #[error("Generation error: {0}")]
    Generation(String),

    /// Vector index write errors
    #[error("Index write error: {0}")]
    IndexWrite(String),

    /// Vector index query errors
    #[error("Index query error: {0}")]
    IndexQuery(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
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
