//! Error types for catalog, draw, and collection storage operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DexError {
    /// The persistence layer rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted collection payload could not be decoded.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog cannot satisfy the draw table.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Location (or another sensor input) is unavailable for this catch.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, DexError>;

impl DexError {
    #[must_use]
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    #[must_use]
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    #[must_use]
    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        Self::PermissionDenied(msg.into())
    }

    #[must_use]
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<std::io::Error> for DexError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<sqlx::Error> for DexError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
