//! Google Books volumes API client

use super::wire::{Volume, VolumeList};
use super::{CatalogLookup, CatalogSearch, SearchQuery};
use crate::error::CatalogError;
use crate::types::{CatalogRecord, ItemId};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Public Google Books endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://www.googleapis.com/books/v1";

/// Retry behaviour for single-record lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupPolicy {
    /// Extra attempts after the first one fails with a transient error
    pub retries: u32,

    /// Delay before the first retry; grows linearly with each attempt
    pub backoff: Duration,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            retries: 0,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Connection settings for [`GoogleBooksClient`]
#[derive(Debug, Clone)]
pub struct GoogleBooksConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
    pub policy: LookupPolicy,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            api_key: None,
            timeout: Some(Duration::from_secs(30)),
            policy: LookupPolicy::default(),
        }
    }
}

/// Why a single lookup attempt produced no record
enum LookupFailure {
    Transport(reqwest::Error),
    Status(StatusCode),
    Malformed(String),
}

impl LookupFailure {
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status(status) => status.is_server_error(),
            Self::Malformed(_) => false,
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "request failed: {e}"),
            Self::Status(status) => write!(f, "catalog responded with {status}"),
            Self::Malformed(reason) => write!(f, "malformed volume: {reason}"),
        }
    }
}

/// HTTP client for the Google Books catalog
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    policy: LookupPolicy,
}

impl GoogleBooksClient {
    pub fn new(config: GoogleBooksConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(config.base_url));
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("bookstore/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            api_key: config.api_key.filter(|key| !key.is_empty()),
            policy: config.policy,
        })
    }

    /// `{base}/volumes[/{id}]`
    fn volumes_url(&self, id: Option<&ItemId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("volumes");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        }
    }

    async fn fetch_volume(&self, id: &ItemId) -> Result<CatalogRecord, LookupFailure> {
        let response = self
            .get(self.volumes_url(Some(id)))
            .send()
            .await
            .map_err(LookupFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupFailure::Status(status));
        }

        let volume: Volume = response
            .json()
            .await
            .map_err(|e| LookupFailure::Malformed(e.to_string()))?;
        volume
            .into_record()
            .ok_or_else(|| LookupFailure::Malformed("missing id or title".to_string()))
    }
}

#[async_trait]
impl CatalogLookup for GoogleBooksClient {
    async fn lookup(&self, id: &ItemId) -> Option<CatalogRecord> {
        let mut attempt = 0;
        loop {
            match self.fetch_volume(id).await {
                Ok(record) => {
                    debug!(%id, "Resolved catalog record");
                    return Some(record);
                }
                Err(failure) if failure.is_transient() && attempt < self.policy.retries => {
                    attempt += 1;
                    debug!(%id, attempt, "Retrying lookup after {}", failure);
                    tokio::time::sleep(self.policy.backoff * attempt).await;
                }
                Err(LookupFailure::Status(StatusCode::NOT_FOUND)) => {
                    debug!(%id, "Catalog has no such volume");
                    return None;
                }
                Err(failure) => {
                    warn!(%id, "Lookup failed: {}", failure);
                    return None;
                }
            }
        }
    }
}

#[async_trait]
impl CatalogSearch for GoogleBooksClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogRecord>, CatalogError> {
        let max_results = query.max_results.to_string();
        let response = self
            .get(self.volumes_url(None))
            .query(&[
                ("q", query.terms.as_str()),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let list: VolumeList = response
            .json()
            .await
            .map_err(|e| CatalogError::MalformedResponse(e.to_string()))?;
        let records = list.into_records();
        debug!(terms = %query.terms, found = records.len(), "Catalog search complete");
        Ok(records)
    }
}
