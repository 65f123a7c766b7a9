//! CLI command implementations

mod collection;
mod featured;
mod search;
mod show;

pub use collection::{cart, likes};
pub use featured::featured;
pub use search::search;
pub use show::show;

use anyhow::Result;
use bookstore_core::storage::{LocalStorage, StorageProvider};
use bookstore_core::{CatalogRecord, Config, GoogleBooksClient};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Shared wiring for every command
pub struct Context {
    pub config: Config,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Storage rooted at the configured data directory
    pub fn storage(&self) -> Arc<dyn StorageProvider> {
        Arc::new(LocalStorage::new(&self.config.data_dir))
    }

    pub fn catalog(&self) -> Result<Arc<GoogleBooksClient>> {
        Ok(Arc::new(GoogleBooksClient::new(self.config.catalog())?))
    }
}

/// Spinner shown on stderr while waiting on the catalog
fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.into());
    Ok(pb)
}

/// Print records either as pretty JSON or as a compact listing
fn print_records(records: &[CatalogRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    for record in records {
        print_summary(record);
    }
    Ok(())
}

/// Two-line summary used by listings
fn print_summary(record: &CatalogRecord) {
    println!("{}  [{}]", record.title, record.id);

    let mut details = Vec::new();
    if !record.authors.is_empty() {
        details.push(format!("by {}", record.authors.join(", ")));
    }
    if let Some(date) = &record.published_date {
        details.push(date.year().to_string());
    }
    details.push(match record.page_count {
        Some(pages) => format!("{} pages", pages),
        None => "N/A".to_string(),
    });
    println!("    {}", details.join(" · "));
}
