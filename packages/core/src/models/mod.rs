//! Data Models
//!
//! This module contains the data structures used throughout Sprig:
//!
//! - `Item` - The stored unit of code (snippet, function, component, template)
//! - `ItemType` - Closed set of item classifications
//! - `ItemStats` - Per-type counts across the library

mod item;
mod stats;

pub use item::{Item, ItemBuilder, ItemType, ValidationError};
pub use stats::ItemStats;
