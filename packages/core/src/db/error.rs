//! Database Error Types
//!
//! This module defines error types for storage operations: connection,
//! statement execution and row decoding failures.

use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
///
/// Everything that can go wrong below the item contract. Validation and
/// not-found outcomes are not storage errors and live in the service layer.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish database connection
    #[error("Failed to connect to database at {path}: {source}")]
    ConnectionFailed {
        path: PathBuf,
        source: libsql::Error,
    },

    /// Permission denied when accessing database
    #[error("Permission denied for database path: {path}")]
    PermissionDenied { path: PathBuf },

    /// Failed to create parent directory
    #[error("Failed to create parent directory for database: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    /// libsql operation error
    #[error("Database operation failed: {0}")]
    LibsqlError(#[from] libsql::Error),

    /// SQL statement failed; the libsql error is kept as the source
    #[error("SQL execution failed: {context}")]
    SqlExecutionError {
        context: String,
        #[source]
        source: libsql::Error,
    },

    /// Stored row could not be decoded into an item
    #[error("Corrupt item row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },

    /// In-memory store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl DatabaseError {
    /// Create a connection failed error
    pub fn connection_failed(path: PathBuf, source: libsql::Error) -> Self {
        Self::ConnectionFailed { path, source }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: PathBuf) -> Self {
        Self::PermissionDenied { path }
    }

    /// Create a SQL execution error with context
    pub fn sql_execution(context: impl Into<String>, source: libsql::Error) -> Self {
        Self::SqlExecutionError {
            context: context.into(),
            source,
        }
    }

    /// Create a corrupt row error
    pub fn corrupt_row(id: i64, reason: impl Into<String>) -> Self {
        Self::CorruptRow {
            id,
            reason: reason.into(),
        }
    }
}
