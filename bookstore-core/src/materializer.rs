//! Resolve collection ids into display-ready records

use crate::catalog::CatalogLookup;
use crate::collection::CollectionStore;
use crate::types::{CatalogRecord, ItemId};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Result of one materialization pass
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Materialized {
    /// Number of ids that were looked up
    pub requested: usize,

    /// Records that resolved, in collection order
    pub records: Vec<CatalogRecord>,
}

impl Materialized {
    /// Ids that could not be resolved on this pass
    pub fn missing(&self) -> usize {
        self.requested - self.records.len()
    }
}

/// Turns ordered ids into ordered records via the catalog
///
/// Nothing is cached between calls: every pass looks every id up again.
#[derive(Clone)]
pub struct Materializer {
    catalog: Arc<dyn CatalogLookup>,
    max_concurrent: usize,
}

impl Materializer {
    pub const DEFAULT_MAX_CONCURRENT: usize = 8;

    pub fn new(catalog: Arc<dyn CatalogLookup>) -> Self {
        Self {
            catalog,
            max_concurrent: Self::DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Bound the number of lookups in flight at once (minimum 1)
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Resolve `ids` in order, dropping any that do not resolve
    pub async fn materialize(&self, ids: &[ItemId]) -> Materialized {
        let catalog = &self.catalog;
        let records: Vec<CatalogRecord> = stream::iter(ids)
            .map(|id| async move { catalog.lookup(id).await })
            .buffered(self.max_concurrent)
            .filter_map(|record| async move { record })
            .collect()
            .await;

        debug!(
            requested = ids.len(),
            resolved = records.len(),
            "Materialized collection"
        );
        Materialized {
            requested: ids.len(),
            records,
        }
    }

    /// Resolve the current contents of a collection store
    pub async fn materialize_store(&self, store: &CollectionStore) -> Materialized {
        self.materialize(store.ids()).await
    }
}
