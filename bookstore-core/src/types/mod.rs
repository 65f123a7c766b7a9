//! Core types shared by the collection and catalog layers

mod item_id;
mod record;

pub use item_id::ItemId;
pub use record::{CatalogRecord, IndustryIdentifier, PublishedDate, Rating};
