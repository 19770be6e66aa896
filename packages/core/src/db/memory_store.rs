//! MemoryItemStore - in-process ItemStore implementation
//!
//! Holds the whole library in a `BTreeMap` behind a single `RwLock`. Writers
//! take the write guard for the full operation, so readers only ever see the
//! state before or after a write. Nothing is persisted; the store is meant for
//! tests and throwaway libraries.

use crate::db::item_store::{search_needle, ItemStore};
use crate::db::DatabaseError;
use crate::models::Item;
use crate::services::LibraryError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct MemoryState {
    items: BTreeMap<i64, Item>,
    /// Highest id ever assigned; survives deletes so ids are never reused
    last_id: i64,
}

/// In-memory ItemStore
#[derive(Debug)]
pub struct MemoryItemStore {
    state: RwLock<MemoryState>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                items: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, LibraryError> {
        self.state.read().map_err(|_| DatabaseError::LockPoisoned.into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, LibraryError> {
        self.state.write().map_err(|_| DatabaseError::LockPoisoned.into())
    }

    fn collect<F>(&self, predicate: F) -> Result<Vec<Item>, LibraryError>
    where
        F: Fn(&Item) -> bool,
    {
        let state = self.read()?;
        Ok(state
            .items
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect())
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn create_item(&self, mut item: Item) -> Result<i64, LibraryError> {
        item.validate()?;

        let mut state = self.write()?;
        let id = state.last_id + 1;
        item.id = id;
        item.created_at = Utc::now();
        state.items.insert(id, item);
        state.last_id = id;

        tracing::debug!(id, "Created item");
        Ok(id)
    }

    async fn update_item(&self, mut item: Item) -> Result<(), LibraryError> {
        item.validate()?;

        let mut state = self.write()?;
        let existing = state
            .items
            .get_mut(&item.id)
            .ok_or_else(|| LibraryError::item_not_found(item.id))?;

        item.created_at = existing.created_at;
        *existing = item;

        tracing::debug!(id = existing.id, "Updated item");
        Ok(())
    }

    async fn delete_item(&self, id: i64) -> Result<(), LibraryError> {
        let mut state = self.write()?;
        state
            .items
            .remove(&id)
            .ok_or_else(|| LibraryError::item_not_found(id))?;

        tracing::debug!(id, "Deleted item");
        Ok(())
    }

    async fn get_item(&self, id: i64) -> Result<Item, LibraryError> {
        let state = self.read()?;
        state
            .items
            .get(&id)
            .cloned()
            .ok_or_else(|| LibraryError::item_not_found(id))
    }

    async fn get_all_items(&self) -> Result<Vec<Item>, LibraryError> {
        self.collect(|_| true)
    }

    async fn get_items_by_type(&self, item_type: &str) -> Result<Vec<Item>, LibraryError> {
        self.collect(|item| item_type.is_empty() || item.item_type.as_str() == item_type)
    }

    async fn get_items_by_language(&self, language: &str) -> Result<Vec<Item>, LibraryError> {
        self.collect(|item| language.is_empty() || item.language == language)
    }

    async fn search_items(&self, query: &str, item_type: &str) -> Result<Vec<Item>, LibraryError> {
        let needle = search_needle(query);
        self.collect(|item| {
            (item_type.is_empty() || item.item_type.as_str() == item_type)
                && needle
                    .as_deref()
                    .map_or(true, |needle| item.matches_lowercase(needle))
        })
    }

    async fn get_unique_languages(&self) -> Result<BTreeSet<String>, LibraryError> {
        let state = self.read()?;
        Ok(state
            .items
            .values()
            .filter(|item| item.has_language())
            .map(|item| item.language.clone())
            .collect())
    }
}
