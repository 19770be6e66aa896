//! Query Service - Predicate Precedence over the Item Store
//!
//! This module turns a combination of up to three predicates (free-text
//! search, exact type, exact language) into a result set. Exactly one
//! predicate selects the primary candidate set from the store; at most one
//! more is applied as an in-memory filter over that set.
//!
//! # Precedence
//!
//! | search | language | type | primary set                    | secondary filter |
//! |--------|----------|------|--------------------------------|------------------|
//! | yes    | any      | any  | `search_items(search, type)`   | language         |
//! | no     | yes      | any  | `get_items_by_language(lang)`  | type             |
//! | no     | no       | yes  | `get_items_by_type(type)`      | none             |
//! | no     | no       | no   | `get_all_items()`              | none             |
//!
//! When search and language are both present, language is only ever a
//! post-filter; it never selects the primary set.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sprig_core::db::MemoryItemStore;
//! use sprig_core::services::{ItemQuery, QueryService};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), sprig_core::LibraryError> {
//! let query_service = QueryService::new(Arc::new(MemoryItemStore::new()));
//!
//! let query = ItemQuery::new().with_search("fetch").with_language("Python");
//! let results = query_service.execute(&query).await?;
//! # Ok(())
//! # }
//! ```

use crate::db::ItemStore;
use crate::models::Item;
use crate::services::LibraryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Combination of predicates for a single read
///
/// Empty strings disable a predicate; a search made only of whitespace is
/// treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    /// Case-insensitive substring over title, tags and content
    #[serde(default)]
    pub search: String,
    /// Exact item type
    #[serde(default, rename = "type")]
    pub item_type: String,
    /// Exact language label
    #[serde(default)]
    pub language: String,
    /// Result ordering
    #[serde(default)]
    pub sort: ItemSort,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = item_type.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn sorted(mut self, sort: ItemSort) -> Self {
        self.sort = sort;
        self
    }

    fn has_search(&self) -> bool {
        !self.search.trim().is_empty()
    }
}

/// Result ordering, applied after filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSort {
    /// Ascending id
    #[default]
    Insertion,
    /// Descending `created_at`, ties broken by descending id
    NewestFirst,
}

/// Predicate that selects the primary candidate set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryPredicate {
    /// Text search, pre-narrowed by type in the same pass (empty = any type)
    Search { query: String, item_type: String },
    Language(String),
    Type(String),
    All,
}

/// In-memory narrowing applied over the primary set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryFilter {
    Language(String),
    Type(String),
}

impl SecondaryFilter {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            SecondaryFilter::Language(language) => item.language == *language,
            SecondaryFilter::Type(item_type) => item.item_type.as_str() == item_type,
        }
    }
}

/// Which predicate runs against the store and which narrows afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub primary: PrimaryPredicate,
    pub secondary: Option<SecondaryFilter>,
}

/// Read-only query façade over an [`ItemStore`]
///
/// Holds no state besides the store handle; every call re-reads the store.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn ItemStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Decide the primary predicate and secondary filter for `query`
    pub fn plan(query: &ItemQuery) -> QueryPlan {
        let language = (!query.language.is_empty()).then(|| query.language.clone());
        let item_type = (!query.item_type.is_empty()).then(|| query.item_type.clone());

        if query.has_search() {
            return QueryPlan {
                primary: PrimaryPredicate::Search {
                    query: query.search.clone(),
                    item_type: query.item_type.clone(),
                },
                secondary: language.map(SecondaryFilter::Language),
            };
        }

        match (language, item_type) {
            (Some(language), item_type) => QueryPlan {
                primary: PrimaryPredicate::Language(language),
                secondary: item_type.map(SecondaryFilter::Type),
            },
            (None, Some(item_type)) => QueryPlan {
                primary: PrimaryPredicate::Type(item_type),
                secondary: None,
            },
            (None, None) => QueryPlan {
                primary: PrimaryPredicate::All,
                secondary: None,
            },
        }
    }

    /// Execute a query and return matching items
    ///
    /// # Errors
    ///
    /// Only storage failures from the underlying store. An unrecognized type
    /// yields an empty list.
    pub async fn execute(&self, query: &ItemQuery) -> Result<Vec<Item>, LibraryError> {
        let plan = Self::plan(query);
        tracing::debug!(?plan, "Executing item query");

        let mut items = match &plan.primary {
            PrimaryPredicate::Search { query, item_type } => {
                self.store.search_items(query, item_type).await?
            }
            PrimaryPredicate::Language(language) => {
                self.store.get_items_by_language(language).await?
            }
            PrimaryPredicate::Type(item_type) => self.store.get_items_by_type(item_type).await?,
            PrimaryPredicate::All => self.store.get_all_items().await?,
        };

        if let Some(filter) = &plan.secondary {
            items.retain(|item| filter.matches(item));
        }

        Self::sort_items(&mut items, query.sort);

        Ok(items)
    }

    /// Sort items in place; insertion order is the store's ascending id
    fn sort_items(items: &mut [Item], sort: ItemSort) {
        match sort {
            ItemSort::Insertion => items.sort_by_key(|item| item.id),
            ItemSort::NewestFirst => items.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
            }),
        }
    }

    pub async fn get_all_items(&self) -> Result<Vec<Item>, LibraryError> {
        self.execute(&ItemQuery::new()).await
    }

    pub async fn get_items_by_type(&self, item_type: &str) -> Result<Vec<Item>, LibraryError> {
        self.execute(&ItemQuery::new().with_type(item_type)).await
    }

    pub async fn get_items_by_language(&self, language: &str) -> Result<Vec<Item>, LibraryError> {
        self.execute(&ItemQuery::new().with_language(language)).await
    }

    /// Search with an optional type narrowing; a blank query falls through
    /// to the type filter
    pub async fn search_items(
        &self,
        query: &str,
        item_type: &str,
    ) -> Result<Vec<Item>, LibraryError> {
        self.execute(&ItemQuery::new().with_search(query).with_type(item_type)).await
    }

    /// Every distinct non-empty language
    pub async fn get_unique_languages(&self) -> Result<BTreeSet<String>, LibraryError> {
        self.store.get_unique_languages().await
    }
}

#[cfg(test)]
mod query_service_test;
