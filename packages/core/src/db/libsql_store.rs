//! LibsqlItemStore - ItemStore Implementation for libsql
//!
//! The durable backend. Wraps a [`DatabaseService`] and translates item
//! operations into SQL against the `items` table.
//!
//! # Design Principles
//!
//! 1. **Single writer**: every mutation holds one async mutex for its full duration
//! 2. **One statement per mutation**: create/update/delete each commit atomically
//!    in autocommit mode, so a failure leaves the table untouched
//! 3. **Row Conversion**: `libsql::Row` to `Item` happens in one place
//! 4. **Case-insensitive search in Rust**: SQLite's `LOWER()` only folds ASCII,
//!    so the text match runs over the type-narrowed rows after the fetch
//!
//! # Examples
//!
//! ```rust,no_run
//! use sprig_core::db::{DatabaseService, ItemStore, LibsqlItemStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/sprig.db")).await?);
//!     let store: Arc<dyn ItemStore> = Arc::new(LibsqlItemStore::new(db));
//!     let items = store.get_all_items().await?;
//!     Ok(())
//! }
//! ```

use crate::db::database::ITEM_COLUMNS;
use crate::db::item_store::{search_needle, ItemStore};
use crate::db::{DatabaseError, DatabaseService};
use crate::models::{Item, ItemType};
use crate::services::LibraryError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::{params::IntoParams, Row};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// ItemStore backed by an embedded libsql database
pub struct LibsqlItemStore {
    db: Arc<DatabaseService>,
    /// Serializes all writers
    write_lock: Mutex<()>,
}

impl LibsqlItemStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Underlying database service
    pub fn database(&self) -> &Arc<DatabaseService> {
        &self.db
    }

    /// Parse timestamp from database - handles both RFC3339 and SQLite formats
    ///
    /// Items are written as RFC3339. SQLite's CURRENT_TIMESTAMP format
    /// ("YYYY-MM-DD HH:MM:SS") is accepted for rows inserted by hand.
    fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok().map(|naive| naive.and_utc())
    }

    /// Convert libsql::Row to Item
    ///
    /// Expected columns (in order): id, title, type, language, tags, content, created_at
    fn row_to_item(row: &Row) -> Result<Item, DatabaseError> {
        let id: i64 = row.get(0)?;
        let title: String = row.get(1)?;
        let type_str: String = row.get(2)?;
        let language: String = row.get(3)?;
        let tags: String = row.get(4)?;
        let content: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        let item_type: ItemType = type_str
            .parse()
            .map_err(|_| DatabaseError::corrupt_row(id, format!("unknown type '{}'", type_str)))?;

        let created_at = Self::parse_timestamp(&created_at_str).ok_or_else(|| {
            DatabaseError::corrupt_row(id, format!("unparseable created_at '{}'", created_at_str))
        })?;

        Ok(Item {
            id,
            title,
            item_type,
            language,
            tags,
            content,
            created_at,
        })
    }

    /// Run a SELECT over the items table and decode every row
    async fn query_items(
        &self,
        where_clause: &str,
        params: impl IntoParams,
    ) -> Result<Vec<Item>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let sql = format!(
            "SELECT {} FROM items{} ORDER BY id ASC",
            ITEM_COLUMNS, where_clause
        );

        let mut rows = conn
            .query(&sql, params)
            .await
            .map_err(|e| DatabaseError::sql_execution("Failed to query items", e))?;

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(Self::row_to_item(&row)?);
        }

        Ok(items)
    }

    async fn query_items_by_type(&self, item_type: &str) -> Result<Vec<Item>, DatabaseError> {
        if item_type.is_empty() {
            self.query_items("", ()).await
        } else {
            self.query_items(" WHERE type = ?", [item_type]).await
        }
    }
}

#[async_trait]
impl ItemStore for LibsqlItemStore {
    async fn create_item(&self, item: Item) -> Result<i64, LibraryError> {
        item.validate()?;

        let _guard = self.write_lock.lock().await;
        let conn = self.db.connect_with_timeout().await?;

        let created_at = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO items (title, type, language, tags, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                item.title.as_str(),
                item.item_type.as_str(),
                item.language.as_str(),
                item.tags.as_str(),
                item.content.as_str(),
                created_at.as_str(),
            ),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution("Failed to insert item", e))?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, item_type = %item.item_type, "Created item");
        Ok(id)
    }

    async fn update_item(&self, item: Item) -> Result<(), LibraryError> {
        item.validate()?;

        let _guard = self.write_lock.lock().await;
        let conn = self.db.connect_with_timeout().await?;

        // created_at is never part of the SET list
        let rows_affected = conn
            .execute(
                "UPDATE items SET title = ?, type = ?, language = ?, tags = ?, content = ?
                 WHERE id = ?",
                (
                    item.title.as_str(),
                    item.item_type.as_str(),
                    item.language.as_str(),
                    item.tags.as_str(),
                    item.content.as_str(),
                    item.id,
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution("Failed to update item", e))?;

        if rows_affected == 0 {
            return Err(LibraryError::item_not_found(item.id));
        }

        tracing::debug!(id = item.id, "Updated item");
        Ok(())
    }

    async fn delete_item(&self, id: i64) -> Result<(), LibraryError> {
        let _guard = self.write_lock.lock().await;
        let conn = self.db.connect_with_timeout().await?;

        let rows_affected = conn
            .execute("DELETE FROM items WHERE id = ?", [id])
            .await
            .map_err(|e| DatabaseError::sql_execution("Failed to delete item", e))?;

        if rows_affected == 0 {
            return Err(LibraryError::item_not_found(id));
        }

        tracing::debug!(id, "Deleted item");
        Ok(())
    }

    async fn get_item(&self, id: i64) -> Result<Item, LibraryError> {
        self.query_items(" WHERE id = ?", [id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LibraryError::item_not_found(id))
    }

    async fn get_all_items(&self) -> Result<Vec<Item>, LibraryError> {
        Ok(self.query_items("", ()).await?)
    }

    async fn get_items_by_type(&self, item_type: &str) -> Result<Vec<Item>, LibraryError> {
        Ok(self.query_items_by_type(item_type).await?)
    }

    async fn get_items_by_language(&self, language: &str) -> Result<Vec<Item>, LibraryError> {
        if language.is_empty() {
            return self.get_all_items().await;
        }
        Ok(self.query_items(" WHERE language = ?", [language]).await?)
    }

    async fn search_items(&self, query: &str, item_type: &str) -> Result<Vec<Item>, LibraryError> {
        let candidates = self.query_items_by_type(item_type).await?;

        Ok(match search_needle(query) {
            Some(needle) => candidates
                .into_iter()
                .filter(|item| item.matches_lowercase(&needle))
                .collect(),
            None => candidates,
        })
    }

    async fn get_unique_languages(&self) -> Result<BTreeSet<String>, LibraryError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut rows = conn
            .query("SELECT DISTINCT language FROM items WHERE language <> ''", ())
            .await
            .map_err(|e| DatabaseError::sql_execution("Failed to query languages", e))?;

        let mut languages = BTreeSet::new();
        while let Some(row) = rows.next().await? {
            let language: String = row.get(0)?;
            languages.insert(language);
        }

        Ok(languages)
    }
}
