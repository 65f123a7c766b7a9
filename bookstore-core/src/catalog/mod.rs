//! Remote book catalog access
//!
//! The catalog is a black box reached over HTTP. Lookups have exactly two
//! outcomes, a normalized record or `None`; every transport, status and
//! payload problem collapses into `None` at this boundary. Searches are
//! allowed to fail so the caller can tell the user.

mod google;
mod wire;

pub use google::{GoogleBooksClient, GoogleBooksConfig, LookupPolicy, DEFAULT_CATALOG_URL};

use crate::error::CatalogError;
use crate::types::{CatalogRecord, ItemId};
use async_trait::async_trait;

/// Resolve a single catalog id to a record
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Look up `id`, returning `None` when it cannot be resolved for any reason
    async fn lookup(&self, id: &ItemId) -> Option<CatalogRecord>;
}

/// Free-text catalog search
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>, CatalogError>;
}

/// A search request against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Query string in the catalog's syntax, e.g. `intitle:"wings of fire"`
    pub terms: String,

    /// Maximum number of results, between 1 and [`SearchQuery::MAX_RESULTS`]
    pub max_results: u32,
}

impl SearchQuery {
    /// Upper bound the catalog accepts for a single page
    pub const MAX_RESULTS: u32 = 40;

    pub fn new(terms: impl Into<String>, max_results: u32) -> Self {
        Self {
            terms: terms.into(),
            max_results: max_results.clamp(1, Self::MAX_RESULTS),
        }
    }
}
