//! Normalized book records resolved from the catalog

use super::ItemId;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved book record
///
/// Every field the catalog may omit is explicit here; nothing downstream
/// inspects raw catalog payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    /// Catalog identifier
    pub id: ItemId,

    /// Book title
    pub title: String,

    /// Subtitle, if any
    pub subtitle: Option<String>,

    /// Authors in catalog order
    pub authors: Vec<String>,

    /// Book description/summary
    pub description: Option<String>,

    /// Cover thumbnail, always served over https
    pub cover_url: Option<String>,

    /// Number of printed pages
    pub page_count: Option<u32>,

    /// Publication date at whatever precision the catalog knows it
    pub published_date: Option<PublishedDate>,

    /// Reader rating
    pub rating: Option<Rating>,

    /// Publisher name
    pub publisher: Option<String>,

    /// Language code (ISO 639-1)
    pub language: Option<String>,

    /// Subject categories
    pub categories: Vec<String>,

    /// ISBNs and other identifiers
    pub identifiers: Vec<IndustryIdentifier>,

    /// Link to the catalog's own page for this book
    pub info_link: Option<String>,
}

impl CatalogRecord {
    /// Create a record with only the required fields
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            authors: Vec::new(),
            description: None,
            cover_url: None,
            page_count: None,
            published_date: None,
            rating: None,
            publisher: None,
            language: None,
            categories: Vec::new(),
            identifiers: Vec::new(),
            info_link: None,
        }
    }

    /// Add an author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the cover URL
    pub fn with_cover_url(mut self, url: impl Into<String>) -> Self {
        self.cover_url = Some(url.into());
        self
    }

    /// Set the page count
    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// Primary author (first listed)
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(|s| s.as_str())
    }

    /// Whether the record has cover art to show
    pub fn has_cover(&self) -> bool {
        self.cover_url.is_some()
    }
}

/// Publication date with the precision the catalog reported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "precision", rename_all = "snake_case")]
pub enum PublishedDate {
    Year { year: i32 },
    Month { year: i32, month: u32 },
    Day { date: NaiveDate },
}

impl PublishedDate {
    /// Parse the catalog's `YYYY`, `YYYY-MM` or `YYYY-MM-DD` forms
    ///
    /// Anything after a `T` (a time component) is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw.split('T').next().unwrap_or(raw);
        let parts: Vec<&str> = raw.split('-').collect();

        match parts.as_slice() {
            [year] => Some(Self::Year {
                year: parse_year(year)?,
            }),
            [year, month] => {
                let month: u32 = month.parse().ok()?;
                if !(1..=12).contains(&month) {
                    return None;
                }
                Some(Self::Month {
                    year: parse_year(year)?,
                    month,
                })
            }
            [_, _, _] => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| Self::Day { date }),
            _ => None,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            Self::Year { year } | Self::Month { year, .. } => *year,
            Self::Day { date } => date.year(),
        }
    }
}

fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        raw.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for PublishedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year { year } => write!(f, "{year:04}"),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Day { date } => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Average reader rating on a 0–5 scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub average: f32,
    pub count: u32,
}

impl Rating {
    pub const MAX: f32 = 5.0;

    /// Create a rating, clamping the average into range
    pub fn new(average: f32, count: u32) -> Self {
        let average = if average.is_finite() {
            average.clamp(0.0, Self::MAX)
        } else {
            0.0
        };
        Self { average, count }
    }

    /// Star breakdown as (full, half, empty), always summing to five
    pub fn stars(&self) -> (u8, u8, u8) {
        // Fields are public, so the average may not have gone through `new`
        let average = Self::new(self.average, self.count).average;
        let full = average.floor() as u8;
        let half = u8::from(average.fract() >= 0.5);
        (full, half, 5 - full - half)
    }
}

/// ISBN or other industry identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndustryIdentifier {
    /// Identifier scheme, e.g. `ISBN_13`
    pub kind: String,
    pub identifier: String,
}
