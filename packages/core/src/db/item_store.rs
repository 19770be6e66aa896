//! ItemStore Trait - Storage Abstraction Layer
//!
//! This module defines the `ItemStore` trait, the seam between the library
//! services and the storage backends. Two implementations exist:
//!
//! - [`LibsqlItemStore`](crate::db::LibsqlItemStore) - durable, file-backed
//! - [`MemoryItemStore`](crate::db::MemoryItemStore) - in-process, for tests and scratch libraries
//!
//! # Contract
//!
//! - Ids are assigned by the store, increase monotonically and are never reused
//! - `created_at` is stamped on create and preserved by every update
//! - Mutations are atomic: a failed write leaves the store unchanged
//! - Every mutation is committed before the call returns
//! - Reads never observe a partially applied write
//!
//! # Examples
//!
//! ```rust,no_run
//! use sprig_core::db::{ItemStore, MemoryItemStore};
//! use sprig_core::models::{Item, ItemType};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), sprig_core::LibraryError> {
//! let store: Arc<dyn ItemStore> = Arc::new(MemoryItemStore::new());
//! let id = store
//!     .create_item(Item::builder("Hello", ItemType::Snippet, "println!(\"hi\")").build())
//!     .await?;
//! let item = store.get_item(id).await?;
//! # Ok(())
//! # }
//! ```

use crate::models::Item;
use crate::services::LibraryError;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Abstraction over item persistence
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across tasks behind an `Arc`.
///
/// Validation of write-time constraints is the store's responsibility as
/// well, so no backend can ever hold an invalid item.
#[async_trait]
pub trait ItemStore: Send + Sync {
    //
    // WRITES
    //

    /// Persist a new item and return its assigned id
    ///
    /// Any id on the input is ignored. `created_at` is set to the current time.
    ///
    /// # Errors
    ///
    /// - `LibraryError::ValidationFailed` if title or content is blank
    /// - `LibraryError::StorageError` on persistence failure
    async fn create_item(&self, item: Item) -> Result<i64, LibraryError>;

    /// Replace every field of an existing item except `created_at`
    ///
    /// # Errors
    ///
    /// - `LibraryError::ValidationFailed` if title or content is blank
    /// - `LibraryError::ItemNotFound` if `item.id` does not exist
    /// - `LibraryError::StorageError` on persistence failure
    async fn update_item(&self, item: Item) -> Result<(), LibraryError>;

    /// Permanently remove an item
    ///
    /// Not idempotent: deleting a missing id fails.
    ///
    /// # Errors
    ///
    /// - `LibraryError::ItemNotFound` if `id` does not exist
    /// - `LibraryError::StorageError` on persistence failure
    async fn delete_item(&self, id: i64) -> Result<(), LibraryError>;

    //
    // READS
    //

    /// Point lookup
    ///
    /// # Errors
    ///
    /// `LibraryError::ItemNotFound` if `id` does not exist.
    async fn get_item(&self, id: i64) -> Result<Item, LibraryError>;

    /// Every item, ascending id
    async fn get_all_items(&self) -> Result<Vec<Item>, LibraryError>;

    /// Items whose stored type equals `item_type` exactly, ascending id
    ///
    /// Empty string means no filter. An unknown type yields an empty list.
    async fn get_items_by_type(&self, item_type: &str) -> Result<Vec<Item>, LibraryError>;

    /// Items whose language equals `language` exactly, ascending id
    ///
    /// Empty string means no filter.
    async fn get_items_by_language(&self, language: &str) -> Result<Vec<Item>, LibraryError>;

    /// Case-insensitive substring search over title, tags and content,
    /// pre-narrowed by exact `item_type` in the same pass
    ///
    /// A blank `query` or empty `item_type` disables that predicate.
    async fn search_items(&self, query: &str, item_type: &str) -> Result<Vec<Item>, LibraryError>;

    /// Every distinct non-empty language
    async fn get_unique_languages(&self) -> Result<BTreeSet<String>, LibraryError>;
}

/// Normalized search needle, `None` when the query disables search
pub(crate) fn search_needle(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_needle_blank_disables_search() {
        assert_eq!(search_needle(""), None);
        assert_eq!(search_needle("   \t"), None);
    }

    #[test]
    fn test_search_needle_lowercases_without_trimming() {
        assert_eq!(search_needle("Fetch Hook"), Some("fetch hook".to_string()));
        assert_eq!(search_needle(" hook"), Some(" hook".to_string()));
    }
}
