//! Error types for Chatkeep
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Chatkeep operations
///
/// Covers configuration loading, provider calls, session storage and
/// session import. Recovered failures (a provider error during a send,
/// a malformed import) are still represented here so the caller decides
/// how to surface them.
#[derive(Error, Debug)]
pub enum ChatkeepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (transport, HTTP status, response parsing)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Session storage errors (key-value store operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// No session matches the given id or id prefix
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Import document was not a JSON array of sessions
    #[error("Failed to import chats: Invalid format")]
    InvalidImportFormat,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Chatkeep operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
