//! Likes and cart command implementations

use super::{print_records, spinner, Context};
use crate::CollectionAction;
use anyhow::Result;
use bookstore_core::{CollectionKind, CollectionStore, ItemId, Materializer};

/// Run one action against the liked books
pub async fn likes(ctx: &Context, action: CollectionAction) -> Result<()> {
    collection(ctx, CollectionKind::Likes, action).await
}

/// Run one action against the cart
pub async fn cart(ctx: &Context, action: CollectionAction) -> Result<()> {
    collection(ctx, CollectionKind::Cart, action).await
}

async fn collection(
    ctx: &Context,
    kind: CollectionKind,
    action: CollectionAction,
) -> Result<()> {
    let mut store = CollectionStore::load(ctx.storage(), kind).await;

    match action {
        CollectionAction::Toggle { id } => {
            let present = store.toggle(id.as_str()).await;
            println!("{}", toggled_message(kind, &id, present));
        }

        CollectionAction::Remove { id } => {
            if store.remove(&ItemId::from(id.as_str())).await {
                println!("Removed {} from {}", id, kind);
            } else {
                println!("{} is not in {}", id, kind);
            }
        }

        CollectionAction::Clear => {
            store.clear().await;
            println!("Cleared {}", kind);
        }

        CollectionAction::Ids { json } => {
            if json {
                println!("{}", serde_json::to_string(store.ids())?);
            } else {
                for id in store.ids() {
                    println!("{}", id);
                }
            }
        }

        CollectionAction::List { json } => list(ctx, &store, json).await?,
    }

    Ok(())
}

async fn list(ctx: &Context, store: &CollectionStore, json: bool) -> Result<()> {
    let kind = store.kind();
    if store.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("{}", empty_message(kind));
        }
        return Ok(());
    }

    let materializer =
        Materializer::new(ctx.catalog()?).with_max_concurrent(ctx.config.max_concurrent_lookups);

    let pb = spinner(format!("Loading {} {}...", store.len(), noun(kind, store.len())))?;
    let materialized = materializer.materialize_store(store).await;
    pb.finish_and_clear();

    if materialized.missing() > 0 {
        tracing::warn!(
            "{} of {} entries in {} could not be loaded",
            materialized.missing(),
            materialized.requested,
            kind
        );
    }

    print_records(&materialized.records, json)?;
    if !json {
        println!("{}", count_message(kind, materialized.records.len()));
    }
    Ok(())
}

fn noun(kind: CollectionKind, count: usize) -> &'static str {
    match (kind, count) {
        (CollectionKind::Likes, 1) => "book",
        (CollectionKind::Likes, _) => "books",
        (CollectionKind::Cart, 1) => "item",
        (CollectionKind::Cart, _) => "items",
    }
}

fn count_message(kind: CollectionKind, count: usize) -> String {
    match kind {
        CollectionKind::Likes => format!("{} {} saved", count, noun(kind, count)),
        CollectionKind::Cart => format!("{} {} in cart", count, noun(kind, count)),
    }
}

fn empty_message(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Likes => "No liked books yet",
        CollectionKind::Cart => "Your cart is empty",
    }
}

fn toggled_message(kind: CollectionKind, id: &str, present: bool) -> String {
    match (kind, present) {
        (CollectionKind::Likes, true) => format!("Liked {}", id),
        (CollectionKind::Likes, false) => format!("Unliked {}", id),
        (CollectionKind::Cart, true) => format!("Added {} to cart", id),
        (CollectionKind::Cart, false) => format!("Removed {} from cart", id),
    }
}
