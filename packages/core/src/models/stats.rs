//! Library statistics
//!
//! Serialized as a flat map (`{"total": 3, "snippet": 2, ...}`) so every item
//! type appears as a key alongside the total.

use crate::models::{Item, ItemType};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Item counts, total and per type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStats {
    pub total: usize,
    /// Always holds an entry for every `ItemType`, zero when absent
    pub by_type: BTreeMap<ItemType, usize>,
}

impl ItemStats {
    /// Count items per type
    pub fn from_items(items: &[Item]) -> Self {
        let mut by_type: BTreeMap<ItemType, usize> =
            ItemType::ALL.into_iter().map(|t| (t, 0)).collect();

        for item in items {
            *by_type.entry(item.item_type).or_insert(0) += 1;
        }

        Self {
            total: items.len(),
            by_type,
        }
    }

    /// Count for a single type
    pub fn count(&self, item_type: ItemType) -> usize {
        self.by_type.get(&item_type).copied().unwrap_or(0)
    }
}

impl Serialize for ItemStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.by_type.len() + 1))?;
        map.serialize_entry("total", &self.total)?;
        for (item_type, count) in &self.by_type {
            map.serialize_entry(item_type.as_str(), count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_library_has_zero_for_every_type() {
        let stats = ItemStats::from_items(&[]);

        assert_eq!(stats.total, 0);
        for item_type in ItemType::ALL {
            assert_eq!(stats.count(item_type), 0);
        }
    }

    #[test]
    fn test_counts_per_type() {
        let items = vec![
            Item::builder("a", ItemType::Snippet, "a").build(),
            Item::builder("b", ItemType::Snippet, "b").build(),
            Item::builder("c", ItemType::Template, "c").build(),
        ];

        let stats = ItemStats::from_items(&items);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.count(ItemType::Snippet), 2);
        assert_eq!(stats.count(ItemType::Template), 1);
        assert_eq!(stats.count(ItemType::Function), 0);
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let items = vec![Item::builder("a", ItemType::Component, "a").build()];
        let value = serde_json::to_value(ItemStats::from_items(&items)).unwrap();

        assert_eq!(
            value,
            json!({
                "total": 1,
                "snippet": 0,
                "function": 0,
                "component": 1,
                "template": 0
            })
        );
    }
}
