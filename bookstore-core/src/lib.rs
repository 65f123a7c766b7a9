//! Bookstore Core Library
//!
//! Local state for a book-discovery storefront: two persisted collections
//! (liked books and cart items), a client for the remote book catalog, and
//! the materializer that turns collection ids back into book records.

pub mod catalog;
pub mod collection;
pub mod config;
pub mod error;
pub mod materializer;
pub mod search;
pub mod storage;
pub mod types;

pub use catalog::{CatalogLookup, CatalogSearch, GoogleBooksClient, SearchQuery};
pub use collection::{CollectionKind, CollectionStore};
pub use config::Config;
pub use error::{BookstoreError, CatalogError, ConfigError, Result, StorageError};
pub use materializer::{Materialized, Materializer};
pub use search::SearchOrchestrator;
pub use types::{CatalogRecord, IndustryIdentifier, ItemId, PublishedDate, Rating};
