//! Business Services
//!
//! This module contains the services that sit on top of the storage layer:
//!
//! - `LibraryService` - the call interface: save, update, delete, reads, stats
//! - `QueryService` - predicate precedence for type, language and search reads
//!
//! Services hold no state of their own besides a shared store handle.

pub mod error;
pub mod library_service;
pub mod query_service;

pub use error::LibraryError;
pub use library_service::LibraryService;
pub use query_service::{
    ItemQuery, ItemSort, PrimaryPredicate, QueryPlan, QueryService, SecondaryFilter,
};
