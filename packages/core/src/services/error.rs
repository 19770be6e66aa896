//! Service Layer Error Types
//!
//! The three error kinds callers of the library observe: validation failures,
//! missing items, and storage failures. Validation and not-found errors are
//! deterministic; storage errors are passed through unmodified and never
//! retried here.

use crate::db::DatabaseError;
use crate::models::ValidationError;
use thiserror::Error;

/// Library operation errors
#[derive(Error, Debug)]
pub enum LibraryError {
    /// No item with this id exists
    #[error("Item not found: {id}")]
    ItemNotFound { id: i64 },

    /// Item failed write-time validation
    #[error("Item validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Underlying persistence failure
    #[error("Storage operation failed: {0}")]
    StorageError(#[from] DatabaseError),
}

impl LibraryError {
    /// Create an item not found error
    pub fn item_not_found(id: i64) -> Self {
        Self::ItemNotFound { id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }
}

impl From<libsql::Error> for LibraryError {
    fn from(err: libsql::Error) -> Self {
        Self::StorageError(DatabaseError::LibsqlError(err))
    }
}
