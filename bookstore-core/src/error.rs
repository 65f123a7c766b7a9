//! Error types for Bookstore Core

use thiserror::Error;

/// Result type alias using BookstoreError
pub type Result<T> = std::result::Result<T, BookstoreError>;

/// Top-level error type for all Bookstore operations
#[derive(Debug, Error)]
pub enum BookstoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by catalog searches
///
/// Lookups never produce these; a failed lookup is reported as a missing record.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog responded with status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised while resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
