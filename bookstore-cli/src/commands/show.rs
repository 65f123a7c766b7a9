//! Show command implementation

use super::{spinner, Context};
use anyhow::{bail, Result};
use bookstore_core::{CatalogLookup, CatalogRecord, CollectionKind, CollectionStore, ItemId};
use serde::Serialize;

/// Book details plus where the book sits in the local collections
#[derive(Serialize)]
struct BookDetails<'a> {
    #[serde(flatten)]
    record: &'a CatalogRecord,
    liked: bool,
    in_cart: bool,
}

/// Display details about a single book
pub async fn show(ctx: &Context, id: &str, json: bool) -> Result<()> {
    let id = ItemId::from(id);
    let catalog = ctx.catalog()?;

    let pb = spinner(format!("Fetching {}...", id))?;
    let record = catalog.lookup(&id).await;
    pb.finish_and_clear();

    let Some(record) = record else {
        bail!("Book not found: {}", id);
    };

    let storage = ctx.storage();
    let likes = CollectionStore::load(storage.clone(), CollectionKind::Likes).await;
    let cart = CollectionStore::load(storage, CollectionKind::Cart).await;

    let details = BookDetails {
        record: &record,
        liked: likes.contains(&id),
        in_cart: cart.contains(&id),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("Title:       {}", record.title);
    if let Some(subtitle) = &record.subtitle {
        println!("Subtitle:    {}", subtitle);
    }
    if !record.authors.is_empty() {
        println!("By:          {}", record.authors.join(", "));
    }
    if let Some(date) = &record.published_date {
        println!("Published:   {}", date);
    }
    if let Some(pages) = record.page_count {
        println!("Pages:       {}", pages);
    }
    if let Some(rating) = &record.rating {
        let (full, half, empty) = rating.stars();
        println!(
            "Rating:      {}{}{} {:.1} ({})",
            "★".repeat(full as usize),
            "½".repeat(half as usize),
            "☆".repeat(empty as usize),
            rating.average,
            rating.count
        );
    }
    if let Some(language) = &record.language {
        println!("Language:    {}", language.to_uppercase());
    }
    if let Some(category) = record.categories.first() {
        println!("Category:    {}", category);
    }
    if let Some(publisher) = &record.publisher {
        println!("Publisher:   {}", publisher);
    }
    for identifier in &record.identifiers {
        println!("{:<13}{}", format!("{}:", identifier.kind), identifier.identifier);
    }
    if let Some(cover) = &record.cover_url {
        println!("Cover:       {}", cover);
    }
    if let Some(link) = &record.info_link {
        println!("More info:   {}", link);
    }
    println!("Liked:       {}", if details.liked { "yes" } else { "no" });
    println!("In cart:     {}", if details.in_cart { "yes" } else { "no" });
    if let Some(description) = &record.description {
        println!();
        println!("{}", description);
    }

    Ok(())
}
