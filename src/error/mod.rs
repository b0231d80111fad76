//! Error types for insightline
//!
//! This module defines the main error type used throughout insightline and
//! the mapping each variant has to an HTTP response at the API boundary
//! (see `server::ApiError`).

use thiserror::Error;

/// Result type alias for insightline operations
pub type Result<T> = std::result::Result<T, InsightlineError>;

/// Main error type for insightline
#[derive(Error, Debug)]
pub enum InsightlineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The store rejected a SQL statement (syntax error, unknown column,
    /// type mismatch). Surfaced to API clients as a 500.
    #[error("SQL error: {0}")]
    Query(String),

    /// The language-model call failed (network error, quota, malformed
    /// response). Surfaced to API clients as a 500. No fallback SQL is
    /// produced.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Missing or malformed request input. Surfaced as a 400.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A request parameter is outside its closed set of accepted values
    /// (e.g. an unknown chart kind). Surfaced as a 400.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),
}
