//! Library Service - the in-process call interface of the item library
//!
//! `LibraryService` is what a presentation layer (desktop view, CLI, tests)
//! talks to. Writes go straight to the [`ItemStore`]; reads go through the
//! [`QueryService`] so predicate precedence is applied in one place.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sprig_core::config::LibraryConfig;
//! use sprig_core::models::{Item, ItemType};
//! use sprig_core::services::LibraryService;
//!
//! # async fn example() -> Result<(), sprig_core::LibraryError> {
//! let library = LibraryService::open(&LibraryConfig::new("./data/sprig.db")).await?;
//!
//! let id = library
//!     .save_item(Item::builder("Fetch Hook", ItemType::Snippet, "fetch(url)").build())
//!     .await?;
//! let found = library.search_items("fetch", "").await?;
//! # Ok(())
//! # }
//! ```

use crate::config::LibraryConfig;
use crate::db::{DatabaseService, ItemStore, LibsqlItemStore, MemoryItemStore};
use crate::models::{Item, ItemStats, ValidationError};
use crate::services::query_service::{ItemQuery, QueryService};
use crate::services::LibraryError;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Item library operations
#[derive(Clone)]
pub struct LibraryService {
    store: Arc<dyn ItemStore>,
    query_service: QueryService,
}

impl LibraryService {
    /// Build a service over an existing store
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        let query_service = QueryService::new(store.clone());
        Self {
            store,
            query_service,
        }
    }

    /// Open the durable library at the configured database path
    ///
    /// # Errors
    ///
    /// `LibraryError::StorageError` if the database cannot be opened or initialized.
    pub async fn open(config: &LibraryConfig) -> Result<Self, LibraryError> {
        let db = DatabaseService::new(config.database_path.clone()).await?;
        Ok(Self::new(Arc::new(LibsqlItemStore::new(Arc::new(db)))))
    }

    /// Ephemeral library that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryItemStore::new()))
    }

    //
    // WRITES
    //

    /// Save a new item; the caller's id is ignored
    ///
    /// # Errors
    ///
    /// - `LibraryError::ValidationFailed` if title or content is blank
    /// - `LibraryError::StorageError` on persistence failure
    pub async fn save_item(&self, item: Item) -> Result<i64, LibraryError> {
        if !item.is_unsaved() {
            tracing::debug!(supplied_id = item.id, "Ignoring caller-supplied id on save");
        }

        self.store.create_item(item).await.map_err(|e| {
            tracing::warn!("Failed to save item: {}", e);
            e
        })
    }

    /// Replace an existing item; `created_at` is always kept from storage
    ///
    /// # Errors
    ///
    /// - `LibraryError::ValidationFailed` if title or content is blank
    /// - `LibraryError::ItemNotFound` if `item.id` does not exist
    /// - `LibraryError::StorageError` on persistence failure
    pub async fn update_item(&self, item: Item) -> Result<(), LibraryError> {
        let id = item.id;
        self.store.update_item(item).await.map_err(|e| {
            tracing::warn!("Failed to update item {}: {}", id, e);
            e
        })
    }

    /// Permanently delete an item
    ///
    /// # Errors
    ///
    /// - `LibraryError::ItemNotFound` if `id` does not exist, including a repeat delete
    /// - `LibraryError::StorageError` on persistence failure
    pub async fn delete_item(&self, id: i64) -> Result<(), LibraryError> {
        self.store.delete_item(id).await.map_err(|e| {
            tracing::warn!("Failed to delete item {}: {}", id, e);
            e
        })
    }

    //
    // READS
    //

    /// Point lookup
    ///
    /// # Errors
    ///
    /// - `LibraryError::ValidationFailed` for ids `<= 0`, which can never exist
    /// - `LibraryError::ItemNotFound` if `id` does not exist
    pub async fn get_item_by_id(&self, id: i64) -> Result<Item, LibraryError> {
        if id <= 0 {
            return Err(ValidationError::InvalidId(id).into());
        }
        self.store.get_item(id).await
    }

    pub async fn get_all_items(&self) -> Result<Vec<Item>, LibraryError> {
        self.query_service.get_all_items().await
    }

    pub async fn get_items_by_type(&self, item_type: &str) -> Result<Vec<Item>, LibraryError> {
        self.query_service.get_items_by_type(item_type).await
    }

    pub async fn get_items_by_language(&self, language: &str) -> Result<Vec<Item>, LibraryError> {
        self.query_service.get_items_by_language(language).await
    }

    /// Text search with optional type narrowing
    pub async fn search_items(
        &self,
        query: &str,
        item_type: &str,
    ) -> Result<Vec<Item>, LibraryError> {
        self.query_service.search_items(query, item_type).await
    }

    /// Full predicate combination (search, type, language, sort)
    pub async fn query_items(&self, query: &ItemQuery) -> Result<Vec<Item>, LibraryError> {
        self.query_service.execute(query).await
    }

    pub async fn get_unique_languages(&self) -> Result<BTreeSet<String>, LibraryError> {
        self.query_service.get_unique_languages().await
    }

    /// Total and per-type item counts
    pub async fn get_item_stats(&self) -> Result<ItemStats, LibraryError> {
        let items = self.store.get_all_items().await?;
        Ok(ItemStats::from_items(&items))
    }
}
