//! Sprig Core: item repository and query engine
//!
//! This crate persists a personal library of code items (snippets, functions,
//! components, templates) and answers filtered and searched reads over it.
//!
//! # Architecture
//!
//! - **Item Store**: durable keyed storage with store-assigned ids (libsql/SQLite)
//! - **Query Engine**: fixed precedence between search, language and type predicates
//! - **Local-first**: single user, single process, no network
//!
//! # Modules
//!
//! - [`models`] - `Item`, `ItemType`, `ItemStats`
//! - [`db`] - Database layer and the `ItemStore` backends
//! - [`services`] - `LibraryService` and `QueryService`
//! - [`config`] - Storage location resolution

pub mod config;
pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::LibraryConfig;
pub use models::*;
pub use services::*;
