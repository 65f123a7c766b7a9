//! Featured command implementation

use super::{print_records, spinner, Context};
use anyhow::Result;
use bookstore_core::search::FEATURED_QUERIES;
use bookstore_core::SearchOrchestrator;

/// Print one featured book per query
pub async fn featured(ctx: &Context, queries: &[String], json: bool) -> Result<()> {
    let orchestrator = SearchOrchestrator::new(ctx.catalog()?);
    let queries: Vec<&str> = if queries.is_empty() {
        FEATURED_QUERIES.to_vec()
    } else {
        queries.iter().map(String::as_str).collect()
    };

    let pb = spinner("Fetching featured books...")?;
    let records = orchestrator.featured(&queries).await;
    pb.finish_and_clear();

    if records.is_empty() && !json {
        println!("No featured books available right now.");
        return Ok(());
    }

    print_records(&records, json)
}
