//! Error types for the catalogue pipeline

use serde::Serialize;
use thiserror::Error;

/// Failure classes reported per identifier at the end of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Catalogue session or query could not complete
    Connection,
    /// Catalogue answered but had no record for the identifier
    NoRecord,
    /// Bytes could not be decoded as a MARC record
    Format,
    /// Local cache could not be read or written
    Cache,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Catalogue connection failed: {0}")]
    Connection(String),

    #[error("No catalogue record for {0}")]
    NoRecord(String),

    #[error("Not cached: {0}")]
    NotFound(String),

    #[error("Malformed MARC record: {0}")]
    Format(String),

    #[error("Invalid system number: {0:?}")]
    InvalidIdentifier(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<&AppError> for FailureKind {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Connection(_) => FailureKind::Connection,
            AppError::NoRecord(_) => FailureKind::NoRecord,
            AppError::Format(_) => FailureKind::Format,
            AppError::NotFound(_)
            | AppError::InvalidIdentifier(_)
            | AppError::Io(_)
            | AppError::Config(_) => FailureKind::Cache,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
