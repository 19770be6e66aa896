//! Database Layer
//!
//! This module handles item persistence:
//!
//! - Database initialization and connection management (`DatabaseService`)
//! - The `ItemStore` trait, the storage seam used by the services
//! - `LibsqlItemStore`, the durable libsql backend
//! - `MemoryItemStore`, an in-process backend for tests and scratch libraries
//!
//! # Architecture
//!
//! Sprig stores items in an embedded SQLite database via libsql. A single
//! `items` table keyed by an autoincrement integer id holds the whole library;
//! SQLite's `sqlite_sequence` table is the persisted id counter.

mod database;
mod error;
mod item_store;
mod libsql_store;
mod memory_store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use item_store::ItemStore;
pub use libsql_store::LibsqlItemStore;
pub use memory_store::MemoryItemStore;
