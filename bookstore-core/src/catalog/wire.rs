//! Catalog payload shapes and their normalization into [`CatalogRecord`]

use crate::types::{CatalogRecord, IndustryIdentifier, ItemId, PublishedDate, Rating};
use serde::Deserialize;

/// A single volume as returned by the catalog
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Volume {
    pub id: Option<String>,
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VolumeInfo {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub image_links: Option<ImageLinks>,
    pub page_count: Option<u32>,
    pub published_date: Option<String>,
    pub average_rating: Option<f32>,
    pub ratings_count: Option<u32>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub industry_identifiers: Vec<WireIdentifier>,
    pub info_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageLinks {
    pub thumbnail: Option<String>,
    pub small_thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

/// A page of search results
///
/// Items are kept raw so one malformed entry does not sink the whole page.
#[derive(Debug, Deserialize)]
pub(crate) struct VolumeList {
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

impl VolumeList {
    pub fn into_records(self) -> Vec<CatalogRecord> {
        self.items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<Volume>(item).ok())
            .filter_map(Volume::into_record)
            .collect()
    }
}

impl Volume {
    /// Normalize into a record; `None` when the id or title is missing
    pub fn into_record(self) -> Option<CatalogRecord> {
        let id = non_empty(self.id)?;
        let info = self.volume_info?;
        let title = non_empty(info.title)?;

        let cover_url = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .map(|url| secure_url(&url));

        Some(CatalogRecord {
            id: ItemId::new(id),
            title,
            subtitle: non_empty(info.subtitle),
            authors: info.authors,
            description: non_empty(info.description),
            cover_url,
            page_count: info.page_count.filter(|&pages| pages > 0),
            published_date: info.published_date.as_deref().and_then(PublishedDate::parse),
            rating: info
                .average_rating
                .map(|average| Rating::new(average, info.ratings_count.unwrap_or(0))),
            publisher: non_empty(info.publisher),
            language: non_empty(info.language),
            categories: info.categories,
            identifiers: info
                .industry_identifiers
                .into_iter()
                .map(|id| IndustryIdentifier {
                    kind: id.kind,
                    identifier: id.identifier,
                })
                .collect(),
            info_link: non_empty(info.info_link),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// The catalog hands out plain-http image links; browsers and proxies want https
fn secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn volume(value: serde_json::Value) -> Option<CatalogRecord> {
        serde_json::from_value::<Volume>(value)
            .ok()
            .and_then(Volume::into_record)
    }

    #[test]
    fn test_full_volume() {
        let record = volume(json!({
            "id": "zyTCAlFPjgYC",
            "volumeInfo": {
                "title": "The Google Story",
                "subtitle": "Inside the Hottest Business",
                "authors": ["David A. Vise", "Mark Malseed"],
                "publisher": "Random House",
                "publishedDate": "2005-11-15",
                "description": "Here is the story...",
                "industryIdentifiers": [
                    { "type": "ISBN_10", "identifier": "055380457X" },
                    { "type": "ISBN_13", "identifier": "9780553804577" }
                ],
                "pageCount": 207,
                "categories": ["Browsers (Computer programs)"],
                "averageRating": 3.5,
                "ratingsCount": 136,
                "imageLinks": {
                    "smallThumbnail": "http://books.google.com/books?id=zyTCAlFPjgYC&zoom=5",
                    "thumbnail": "http://books.google.com/books?id=zyTCAlFPjgYC&zoom=1"
                },
                "language": "en",
                "infoLink": "https://books.google.com/books?id=zyTCAlFPjgYC"
            }
        }))
        .unwrap();

        assert_eq!(record.id.as_str(), "zyTCAlFPjgYC");
        assert_eq!(record.title, "The Google Story");
        assert_eq!(record.authors, ["David A. Vise", "Mark Malseed"]);
        assert_eq!(
            record.cover_url.as_deref(),
            Some("https://books.google.com/books?id=zyTCAlFPjgYC&zoom=1")
        );
        assert_eq!(record.page_count, Some(207));
        assert_eq!(record.published_date.map(|d| d.year()), Some(2005));
        assert_eq!(record.rating, Some(Rating::new(3.5, 136)));
        assert_eq!(record.identifiers.len(), 2);
        assert_eq!(record.identifiers[1].kind, "ISBN_13");
        assert_eq!(record.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_sparse_volume() {
        let record = volume(json!({
            "id": "b1",
            "volumeInfo": { "title": "Untitled Draft", "pageCount": 0, "publishedDate": "unknown" }
        }))
        .unwrap();

        assert!(record.authors.is_empty());
        assert_eq!(record.description, None);
        assert_eq!(record.cover_url, None);
        assert_eq!(record.page_count, None);
        assert_eq!(record.published_date, None);
        assert_eq!(record.rating, None);
    }

    #[test]
    fn test_rating_without_count() {
        let record = volume(json!({
            "id": "b1",
            "volumeInfo": { "title": "T", "averageRating": 4 }
        }))
        .unwrap();
        assert_eq!(record.rating, Some(Rating::new(4.0, 0)));
    }

    #[test]
    fn test_small_thumbnail_fallback() {
        let record = volume(json!({
            "id": "b1",
            "volumeInfo": {
                "title": "T",
                "imageLinks": { "smallThumbnail": "https://covers.example/b1.jpg" }
            }
        }))
        .unwrap();
        assert_eq!(
            record.cover_url.as_deref(),
            Some("https://covers.example/b1.jpg")
        );
    }

    #[test]
    fn test_missing_required_fields() {
        assert!(volume(json!({ "volumeInfo": { "title": "T" } })).is_none());
        assert!(volume(json!({ "id": "b1" })).is_none());
        assert!(volume(json!({ "id": "b1", "volumeInfo": {} })).is_none());
        assert!(volume(json!({ "id": "", "volumeInfo": { "title": "T" } })).is_none());
        assert!(volume(json!({ "id": "b1", "volumeInfo": { "title": "  " } })).is_none());
    }

    #[test]
    fn test_volume_list_skips_bad_items() {
        let list: VolumeList = serde_json::from_value(json!({
            "kind": "books#volumes",
            "totalItems": 3,
            "items": [
                { "id": "a", "volumeInfo": { "title": "A" } },
                { "id": "b", "volumeInfo": { "title": "B", "pageCount": "many" } },
                { "id": "c", "volumeInfo": { "title": "C" } }
            ]
        }))
        .unwrap();

        let ids: Vec<String> = list
            .into_records()
            .into_iter()
            .map(|r| r.id.into_inner())
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_volume_list_without_items() {
        let list: VolumeList =
            serde_json::from_value(json!({ "kind": "books#volumes", "totalItems": 0 })).unwrap();
        assert!(list.into_records().is_empty());
    }
}
