//! Custom error types for the account store

use common::StoreError;
use thiserror::Error;

/// Domain-level error returned by account store operations
#[derive(Error, Debug)]
pub enum AccountError {
    /// A user with the same email is already registered
    #[error("User {email} exists already")]
    DuplicateUser { email: String },

    /// A write was rejected by the store
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// The caller passed an argument the operation cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A model could not be mapped to or from a document
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Type alias for account store results
pub type AccountResult<T> = Result<T, AccountError>;
