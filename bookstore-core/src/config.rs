//! Runtime configuration resolved from the environment

use crate::catalog::{GoogleBooksConfig, LookupPolicy, DEFAULT_CATALOG_URL};
use crate::error::ConfigError;
use crate::materializer::Materializer;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_DATA_DIR: &str = "BOOKSTORE_DATA_DIR";
pub const ENV_API_KEY: &str = "GOOGLE_BOOKS_API_KEY";
pub const ENV_CATALOG_URL: &str = "BOOKSTORE_CATALOG_URL";
pub const ENV_LOOKUP_RETRIES: &str = "BOOKSTORE_LOOKUP_RETRIES";
pub const ENV_MAX_CONCURRENT: &str = "BOOKSTORE_MAX_CONCURRENT_LOOKUPS";
pub const ENV_TIMEOUT_SECS: &str = "BOOKSTORE_REQUEST_TIMEOUT_SECS";

/// Default directory for persisted collections
pub const DEFAULT_DATA_DIR: &str = "./bookstore_data";

/// Everything needed to wire up storage and the catalog client
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding persisted collection snapshots
    pub data_dir: PathBuf,

    /// Catalog API credential, sent as the `key` query parameter
    pub api_key: Option<String>,

    pub catalog_url: String,

    pub lookup_retries: u32,

    pub max_concurrent_lookups: usize,

    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            api_key: None,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            lookup_retries: 0,
            max_concurrent_lookups: Materializer::DEFAULT_MAX_CONCURRENT,
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// Unset and empty variables fall back to defaults. A timeout of `0`
    /// disables the timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let request_timeout = match parse_var::<u64>(ENV_TIMEOUT_SECS, var(ENV_TIMEOUT_SECS))? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.request_timeout,
        };

        Ok(Self {
            data_dir: var(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            api_key: var(ENV_API_KEY),
            catalog_url: var(ENV_CATALOG_URL).unwrap_or(defaults.catalog_url),
            lookup_retries: parse_var(ENV_LOOKUP_RETRIES, var(ENV_LOOKUP_RETRIES))?
                .unwrap_or(defaults.lookup_retries),
            max_concurrent_lookups: parse_var(ENV_MAX_CONCURRENT, var(ENV_MAX_CONCURRENT))?
                .unwrap_or(defaults.max_concurrent_lookups),
            request_timeout,
        })
    }

    /// Catalog client settings derived from this configuration
    pub fn catalog(&self) -> GoogleBooksConfig {
        GoogleBooksConfig {
            base_url: self.catalog_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout,
            policy: LookupPolicy {
                retries: self.lookup_retries,
                ..LookupPolicy::default()
            },
        }
    }
}

fn parse_var<T: FromStr>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.catalog_url, "https://www.googleapis.com/books/v1");
        assert_eq!(config.data_dir, PathBuf::from("./bookstore_data"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BOOKSTORE_DATA_DIR", "/tmp/shelf"),
            ("GOOGLE_BOOKS_API_KEY", "secret"),
            ("BOOKSTORE_CATALOG_URL", "http://localhost:9000"),
            ("BOOKSTORE_LOOKUP_RETRIES", "2"),
            ("BOOKSTORE_MAX_CONCURRENT_LOOKUPS", "4"),
            ("BOOKSTORE_REQUEST_TIMEOUT_SECS", "0"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/shelf"));
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.lookup_retries, 2);
        assert_eq!(config.max_concurrent_lookups, 4);
        assert_eq!(config.request_timeout, None);

        let catalog = config.catalog();
        assert_eq!(catalog.base_url, "http://localhost:9000");
        assert_eq!(catalog.policy.retries, 2);
    }

    #[test]
    fn test_empty_values_fall_back() {
        let config = config_from(&[
            ("GOOGLE_BOOKS_API_KEY", ""),
            ("BOOKSTORE_LOOKUP_RETRIES", " "),
        ])
        .unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.lookup_retries, 0);
    }

    #[test]
    fn test_invalid_number() {
        let err = config_from(&[("BOOKSTORE_LOOKUP_RETRIES", "lots")]).unwrap_err();
        assert!(err.to_string().contains("BOOKSTORE_LOOKUP_RETRIES"));
    }
}
