//! Search command implementation

use super::{print_records, spinner, Context};
use anyhow::{Context as _, Result};
use bookstore_core::SearchOrchestrator;

/// Search the catalog and print matching books
pub async fn search(ctx: &Context, query: &str, max_results: u32, json: bool) -> Result<()> {
    let orchestrator = SearchOrchestrator::new(ctx.catalog()?);

    let pb = spinner("Searching catalog...")?;
    let result = orchestrator.search_with_limit(query, max_results).await;
    pb.finish_and_clear();

    let records = result.context("Failed to fetch books. Please try again.")?;
    tracing::debug!("Search returned {} records", records.len());

    if records.is_empty() && !json {
        println!("No books found. Try searching for something else or check your spelling.");
        return Ok(());
    }

    print_records(&records, json)
}
