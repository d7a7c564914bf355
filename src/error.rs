// src/error.rs

//! Error types shared by the storage and catalog layers

use crate::catalog::ValidationErrors;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Input was rejected before any storage mutation
    #[error("Validation failed: {0}")]
    ValidationError(ValidationErrors),

    #[error("{0} not found")]
    NotFound(String),

    /// A storage constraint (foreign key, NOT NULL, CHECK) was violated
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    #[error("Database error: {0}")]
    DatabaseError(rusqlite::Error),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Initialization error: {0}")]
    InitError(String),

    /// A record was used as stored before it was inserted
    #[error("{0} has not been inserted")]
    NotInserted(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, ref msg)
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Error::IntegrityError(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            other => Error::DatabaseError(other),
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::ValidationError(errors)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl Error {
    /// True when the error should be reported as a client mistake
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::ValidationError(_) | Error::NotFound(_))
    }
}
