//! Database error types

use thiserror::Error;

use core_kernel::StoreError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Pool exhaustion - no available connections
    #[error("connection pool exhausted")]
    PoolExhausted,

    /// Generic SQL error
    #[error("sql error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Maps a SQLx error to a more specific variant based on the
    /// PostgreSQL error code
    pub fn classify(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23505") => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                    Some("23503") => {
                        DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                    }
                    Some("23514") => {
                        DatabaseError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                }
            }
            _ => DatabaseError::Sql(error),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, DatabaseError::DuplicateEntry(_))
    }
}

/// Database errors cross the store port as `StoreError`, keeping the domain
/// free of SQL details
impl From<DatabaseError> for StoreError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(msg) => StoreError::internal(msg),
            DatabaseError::DuplicateEntry(msg)
            | DatabaseError::ForeignKeyViolation(msg)
            | DatabaseError::ConstraintViolation(msg) => StoreError::conflict(msg),
            DatabaseError::ConnectionFailed(msg) => StoreError::connection(msg),
            DatabaseError::PoolExhausted => {
                StoreError::connection("connection pool exhausted")
            }
            other => StoreError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_classifies() {
        let error = DatabaseError::classify(sqlx::Error::RowNotFound);
        assert!(matches!(error, DatabaseError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_crosses_port_as_conflict() {
        let store_error: StoreError =
            DatabaseError::DuplicateEntry("valuations_loan_id_key".to_string()).into();
        assert!(store_error.is_conflict());
    }
}
