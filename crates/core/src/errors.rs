//! Core error types for statement ingestion.
//!
//! Storage-specific errors (SQLite, etc.) are converted to `DatabaseError` by
//! the storage layer so this crate stays storage-agnostic.

use thiserror::Error;

use crate::registry::{ConfigError, ResolutionError};
use crate::statements::ParseError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ingestion core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parser resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("Statement parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Database-agnostic error type for storage operations.
///
/// Details are kept as strings so storage crates can convert their own error
/// types into this one.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Failed to create database connection pool: {0}")]
    PoolCreationFailed(String),

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Failed to encode or decode a stored value: {0}")]
    Serialization(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}
