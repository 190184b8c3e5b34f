//! Custom error types for the common library
//!
//! This module defines the error type returned by every document collection
//! backend, so that callers can react to store failures without knowing which
//! backend produced them.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// SQLSTATE reported by PostgreSQL for a unique constraint violation
const UNIQUE_VIOLATION: &str = "23505";

/// Custom error type for document store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write violated a uniqueness constraint of the collection
    #[error("Duplicate key in collection {collection}: {message}")]
    DuplicateKey { collection: String, message: String },

    /// A write failed for any reason other than a duplicate key
    #[error("Write error: {0}")]
    Write(String),

    /// Error occurred while reading from the store
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value is not a JSON object
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Classify a failed write statement, separating unique violations from other failures
    pub fn from_write(collection: &str, err: SqlxError) -> Self {
        if let SqlxError::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::DuplicateKey {
                    collection: collection.to_string(),
                    message: db_err.message().to_string(),
                };
            }
        }

        StoreError::Write(err.to_string())
    }

    /// Whether this error reports a uniqueness constraint violation
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
