//! Error taxonomy for store ports
//!
//! Every `LoanStore` implementation (PostgreSQL, in-memory, ...) reports
//! failures through this one type, so the domain layer never sees
//! database-specific errors.

use std::fmt;
use thiserror::Error;

/// Error type for store port operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity was not found
    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// The write conflicts with existing data (e.g. a uniqueness constraint)
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Connection to the underlying store failed
    #[error("connection error: {message}")]
    Connection { message: String },

    /// An internal store error occurred
    #[error("internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    /// Creates a NotFound error
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        StoreError::Connection {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns true if this error is a uniqueness/integrity conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
