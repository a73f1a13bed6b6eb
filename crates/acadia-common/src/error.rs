//! Error types shared across the Acadia workspace

use thiserror::Error;

/// Result type alias for Acadia operations
pub type Result<T> = std::result::Result<T, AcadiaError>;

/// Main error type for cross-crate failures
#[derive(Error, Debug)]
pub enum AcadiaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
