//! Database Connection Management
//!
//! This module provides database connection and schema initialization for the
//! item library using libsql (embedded SQLite).
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf; missing parent directories are created
//! - **Single table**: `items` keyed by `INTEGER PRIMARY KEY AUTOINCREMENT`
//! - **Id counter**: SQLite's `sqlite_sequence` holds the high-water mark, so ids are never reused
//! - **WAL mode**: Readers see the last committed state while a writer is active
//! - **Durable commits**: `synchronous = FULL` on every connection
//!
//! # Database Connection Patterns
//!
//! Use `connect_with_timeout()` in async code. It configures the busy timeout
//! and durability pragmas on the fresh connection.
//!
//! ```no_run
//! # use sprig_core::db::DatabaseService;
//! # use std::path::PathBuf;
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db_service = DatabaseService::new(PathBuf::from("./data/sprig.db")).await?;
//! let conn = db_service.connect_with_timeout().await?;
//! # Ok(())
//! # }
//! ```

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Column list shared by every item SELECT, in row-decoding order
pub(crate) const ITEM_COLUMNS: &str = "id, title, type, language, tags, content, created_at";

/// Database service for managing the libsql connection and schema
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Open or create the database at `db_path`
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        let is_new_database = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema(is_new_database).await?;

        tracing::info!(
            path = %service.db_path.display(),
            new = is_new_database,
            "Item database ready"
        );

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so they go through query() instead of execute().
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let context = || format!("Failed to execute '{}'", pragma);

        let mut stmt = conn
            .prepare(pragma)
            .await
            .map_err(|e| DatabaseError::sql_execution(context(), e))?;
        let _ = stmt
            .query(())
            .await
            .map_err(|e| DatabaseError::sql_execution(context(), e))?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Idempotent: safe to call on an existing database.
    async fn initialize_schema(&self, is_new_database: bool) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL").await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                type TEXT NOT NULL,
                language TEXT NOT NULL DEFAULT '',
                tags TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution("Failed to create items table", e))?;

        self.create_indexes(&conn).await?;

        // Flush the schema out of the WAL so a fresh file is complete on disk
        if is_new_database {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)").await?;
        }

        Ok(())
    }

    /// Create lookup indexes for the type and language filters
    async fn create_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        let indexes = [
            ("idx_items_type", "items(type)"),
            ("idx_items_language", "items(language)"),
            ("idx_items_created_at", "items(created_at)"),
        ];

        for (name, target) in indexes {
            conn.execute(
                &format!("CREATE INDEX IF NOT EXISTS {} ON {}", name, target),
                (),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to create index '{}'", name), e)
            })?;
        }

        Ok(())
    }

    /// Get a raw connection without per-connection configuration
    ///
    /// Prefer `connect_with_timeout()` in async code.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get a connection with busy timeout and durable commits configured
    ///
    /// The 5-second busy timeout makes a reader wait for a concurrent writer's
    /// lock instead of failing with `SQLITE_BUSY`.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000").await?;
        self.execute_pragma(&conn, "PRAGMA synchronous = FULL").await?;

        Ok(conn)
    }

    /// Checkpoint the WAL so all committed writes live in the main file
    ///
    /// Call before shutdown or before copying the database file.
    pub async fn db_close(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)").await?;
        Ok(())
    }
}
