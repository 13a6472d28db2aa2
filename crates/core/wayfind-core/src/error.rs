//! Error types for Wayfind core

use thiserror::Error;

/// Main error type for Wayfind operations
#[derive(Debug, Error)]
pub enum WayfindError {
    /// Database operation error (from sqlx)
    #[error("Database error: {0}")]
    DatabaseSqlx(#[from] sqlx::Error),

    /// Database operation error (custom message)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict with existing state (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Embedding computation unavailable or failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication/authorization error
    #[error("Auth error: {0}")]
    Auth(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using WayfindError
pub type Result<T> = std::result::Result<T, WayfindError>;

impl WayfindError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        WayfindError::Database(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        WayfindError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        WayfindError::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        WayfindError::Conflict(msg.into())
    }

    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        WayfindError::Embedding(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        WayfindError::NotFound(msg.into())
    }

    /// Create an auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        WayfindError::Auth(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        WayfindError::Timeout(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        WayfindError::Other(msg.into())
    }
}
