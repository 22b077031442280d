//! Catalog API response parsing
//!
//! This module defines the response bodies of both list resources:
//! - The overview resource, one list per category with its number one first
//! - The per-category list resource, a single ranked list
//!
//! Both carry `next_published_date`, the cursor of the following page.
//! Fields the crawl depends on are required: a body that parses as JSON but
//! lacks them is a schema fault.

use serde::{Deserialize, Deserializer};

/// Top-level wrapper every catalog response shares
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub results: T,
}

/// Results of the overview resource
#[derive(Debug, Clone, Deserialize)]
pub struct OverviewResults {
    pub lists: Vec<OverviewList>,

    #[serde(deserialize_with = "nullable_string")]
    pub next_published_date: String,
}

/// One list inside the overview, books in rank order
#[derive(Debug, Clone, Deserialize)]
pub struct OverviewList {
    #[serde(default)]
    pub list_name: Option<String>,

    pub books: Vec<RawBook>,
}

/// Results of the per-category list resource
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryResults {
    pub books: Vec<RawBook>,

    #[serde(deserialize_with = "nullable_string")]
    pub next_published_date: String,
}

/// A book entry as the catalog returns it
#[derive(Debug, Clone, Deserialize)]
pub struct RawBook {
    pub title: String,

    #[serde(default)]
    pub author: Option<String>,

    /// Attribution line, e.g. "by Jane Doe"
    #[serde(default)]
    pub contributor: Option<String>,
}

impl RawBook {
    /// The raw author string: the contributor line if present, else the author field
    pub fn raw_author(&self) -> Option<&str> {
        [self.contributor.as_deref(), self.author.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
    }
}

/// A fetched page reduced to what the crawler consumes
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub books: Vec<RawBook>,
    pub next_published_date: String,
}

impl From<OverviewResults> for ListPage {
    /// Keeps the number one (first book) of every list; empty lists are skipped
    fn from(results: OverviewResults) -> Self {
        let books = results
            .lists
            .into_iter()
            .filter_map(|list| {
                let first = list.books.into_iter().next();
                if first.is_none() {
                    tracing::debug!(
                        "Skipping empty overview list {}",
                        list.list_name.as_deref().unwrap_or("<unnamed>")
                    );
                }
                first
            })
            .collect();

        Self {
            books,
            next_published_date: results.next_published_date,
        }
    }
}

impl From<CategoryResults> for ListPage {
    fn from(results: CategoryResults) -> Self {
        Self {
            books: results.books,
            next_published_date: results.next_published_date,
        }
    }
}

/// Requires the field to be present but reads `null` as the empty string
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
