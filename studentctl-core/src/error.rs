/// Structured error types for student storage.
///
/// Each variant is a failure kind the shell presents differently, so
/// callers match on the kind instead of parsing messages.
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by every [`StudentStore`](crate::StudentStore) operation
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database unreachable, credentials rejected, or database missing
    #[error("could not reach the database: {source}")]
    Connection { source: BoxError },

    /// Insert collided with an existing primary key
    #[error("a student with id {id} already exists")]
    Duplicate { id: i32 },

    /// Update or delete targeted an id with no row
    #[error("student {id} not found")]
    NotFound { id: i32 },

    /// Any other statement failure
    #[error("database error: {source}")]
    Query { source: BoxError },
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a connectivity error
    pub fn connection(source: impl Into<BoxError>) -> Self {
        Self::Connection {
            source: source.into(),
        }
    }

    /// Create a statement error
    pub fn query(source: impl Into<BoxError>) -> Self {
        Self::Query {
            source: source.into(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
