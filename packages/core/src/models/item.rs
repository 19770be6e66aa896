//! Item Data Structures
//!
//! This module defines the `Item` struct, the only entity stored in a Sprig
//! library, together with its `ItemType` classification and write-time
//! validation rules.
//!
//! # Identity
//!
//! - `id == 0` is the "unsaved" sentinel; the store assigns real ids on create
//! - `created_at` is stamped by the store and never changes afterwards
//!
//! # Examples
//!
//! ```rust
//! use sprig_core::models::{Item, ItemType};
//!
//! let item = Item::builder("Fetch Hook", ItemType::Snippet, "const useFetch = () => {};")
//!     .with_language("JavaScript")
//!     .with_tags("react, hooks")
//!     .build();
//!
//! assert!(item.is_unsaved());
//! assert!(item.validate().is_ok());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation errors for Item writes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid item type: {0}")]
    InvalidItemType(String),

    #[error("Invalid item ID: {0}")]
    InvalidId(i64),
}

/// Classification of a stored item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Snippet,
    Function,
    Component,
    Template,
}

impl ItemType {
    /// Every item type, in declaration order
    pub const ALL: [ItemType; 4] = [
        ItemType::Snippet,
        ItemType::Function,
        ItemType::Component,
        ItemType::Template,
    ];

    /// Stored/serialized form of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Snippet => "snippet",
            ItemType::Function => "function",
            ItemType::Component => "component",
            ItemType::Template => "template",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ValidationError;

    /// Exact, case-sensitive parse. Unknown values are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidItemType(s.to_string()))
    }
}

/// A stored unit of code.
///
/// # Fields
///
/// - `id`: Store-assigned identifier (`0` until saved)
/// - `title`: Display title, required
/// - `item_type`: Snippet, function, component or template
/// - `language`: Free-form language label, empty string means unset
/// - `tags`: Comma-delimited labels, treated as opaque text
/// - `content`: The code itself, required
/// - `created_at`: Creation timestamp, stamped by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: i64,

    pub title: String,

    #[serde(rename = "type")]
    pub item_type: ItemType,

    #[serde(default)]
    pub language: String,

    #[serde(default)]
    pub tags: String,

    pub content: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Start building an unsaved item with its required fields
    pub fn builder(
        title: impl Into<String>,
        item_type: ItemType,
        content: impl Into<String>,
    ) -> ItemBuilder {
        ItemBuilder {
            title: title.into(),
            item_type,
            content: content.into(),
            language: String::new(),
            tags: String::new(),
        }
    }

    /// Whether this item has not been assigned an id yet
    pub fn is_unsaved(&self) -> bool {
        self.id == 0
    }

    /// Validate the write-time constraints
    ///
    /// `title` and `content` must be non-empty after trimming. The type is
    /// already guaranteed by `ItemType`; raw strings are checked when parsed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` naming the first empty field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".to_string()));
        }

        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingField("content".to_string()));
        }

        Ok(())
    }

    /// Whether the language label is set
    pub fn has_language(&self) -> bool {
        !self.language.is_empty()
    }

    /// Case-insensitive substring match over title, tags and content.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.tags.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }
}

/// Builder for unsaved items
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    title: String,
    item_type: ItemType,
    content: String,
    language: String,
    tags: String,
}

impl ItemBuilder {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Build the item with `id = 0` and a provisional `created_at`
    ///
    /// The store overwrites `created_at` on create.
    pub fn build(self) -> Item {
        Item {
            id: 0,
            title: self.title,
            item_type: self.item_type,
            language: self.language,
            tags: self.tags,
            content: self.content,
            created_at: Utc::now(),
        }
    }
}
