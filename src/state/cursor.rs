//! Cursor definitions for resumable pagination
//!
//! A cursor is an opaque date token. It is only ever compared against the
//! empty string; the crawler never does date arithmetic on it.

use std::fmt;

/// Represents where the crawl of one resource stands
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CrawlCursor {
    /// Nothing fetched yet; the resource's epoch date is queried first
    #[default]
    NotStarted,

    /// The next page to query
    At(String),

    /// The source signalled there are no more pages
    Exhausted,
}

impl CrawlCursor {
    /// Builds a cursor from a `next_published_date` echo
    ///
    /// An empty value terminates the crawl.
    pub fn from_next(next_published_date: &str) -> Self {
        if next_published_date.is_empty() {
            Self::Exhausted
        } else {
            Self::At(next_published_date.to_string())
        }
    }

    /// Returns the date to query next, or None once the resource is exhausted
    pub fn query_date<'a>(&'a self, epoch: &'a str) -> Option<&'a str> {
        match self {
            Self::NotStarted => Some(epoch),
            Self::At(date) => Some(date.as_str()),
            Self::Exhausted => None,
        }
    }

    /// Returns true if there are no more pages to fetch
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Maps the persisted form: an absent key is NotStarted, `""` is Exhausted
    pub fn from_persisted(value: Option<String>) -> Self {
        match value {
            None => Self::NotStarted,
            Some(date) => Self::from_next(&date),
        }
    }

    /// Converts to the persisted form, the inverse of `from_persisted`
    pub fn to_persisted(&self) -> Option<String> {
        match self {
            Self::NotStarted => None,
            Self::At(date) => Some(date.clone()),
            Self::Exhausted => Some(String::new()),
        }
    }
}

impl fmt::Display for CrawlCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::At(date) => write!(f, "{}", date),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}
