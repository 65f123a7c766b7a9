//! Search, featured picks, and debounced suggestions on top of the catalog

use crate::catalog::{CatalogSearch, SearchQuery};
use crate::error::CatalogError;
use crate::types::CatalogRecord;
use futures::future::join_all;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Browse query used when the user has not typed anything
pub const DEFAULT_QUERY: &str = "subject:books";

/// Page size for regular searches
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Built-in featured shelf: one biography per query
pub const FEATURED_QUERIES: [&str; 5] = [
    r#"intitle:"autobiography of mahatma gandhi""#,
    r#"intitle:"subhas chandra bose autobiography""#,
    r#"intitle:"bhagat singh biography""#,
    r#"intitle:"wings of fire abdul kalam""#,
    r#"intitle:"nehru autobiography""#,
];

/// Drives catalog queries for the storefront
pub struct SearchOrchestrator {
    catalog: Arc<dyn CatalogSearch>,
    debounce: Duration,
    generation: AtomicU64,
}

impl SearchOrchestrator {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

    /// Suggestions are only fetched for prefixes at least this long
    pub const MIN_SUGGEST_LEN: usize = 2;

    pub const MAX_SUGGESTIONS: u32 = 5;

    pub fn new(catalog: Arc<dyn CatalogSearch>) -> Self {
        Self {
            catalog,
            debounce: Self::DEFAULT_DEBOUNCE,
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Run a search, falling back to the browse query for blank input
    pub async fn search(&self, raw: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        self.search_with_limit(raw, DEFAULT_MAX_RESULTS).await
    }

    pub async fn search_with_limit(
        &self,
        raw: &str,
        max_results: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let terms = match raw.trim() {
            "" => DEFAULT_QUERY,
            trimmed => trimmed,
        };
        self.catalog
            .search(&SearchQuery::new(terms, max_results))
            .await
    }

    /// First hit of each query, kept only when it has a cover
    ///
    /// Queries run concurrently; output follows query order. Failed queries
    /// are skipped.
    pub async fn featured(&self, queries: &[&str]) -> Vec<CatalogRecord> {
        let lookups = queries.iter().map(|terms| async move {
            match self.catalog.search(&SearchQuery::new(*terms, 1)).await {
                Ok(records) => records.into_iter().next().filter(CatalogRecord::has_cover),
                Err(e) => {
                    warn!(terms, "Featured query failed: {}", e);
                    None
                }
            }
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// Debounced type-ahead suggestions
    ///
    /// Resolves to `None` when a later call superseded this one before the
    /// debounce window elapsed.
    pub async fn suggest(&self, prefix: &str) -> Option<Vec<CatalogRecord>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let prefix = prefix.trim();
        if prefix.chars().count() < Self::MIN_SUGGEST_LEN {
            return Some(Vec::new());
        }

        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            debug!(prefix, "Suggestion superseded");
            return None;
        }

        match self
            .catalog
            .search(&SearchQuery::new(prefix, Self::MAX_SUGGESTIONS))
            .await
        {
            Ok(records) => Some(records),
            Err(e) => {
                warn!(prefix, "Suggestion query failed: {}", e);
                Some(Vec::new())
            }
        }
    }
}
