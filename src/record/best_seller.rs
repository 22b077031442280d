use crate::record::normalize::{normalize_author, title_case};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single best-seller entry
///
/// `date` is the ISO-8601 cursor value the entry was fetched under, never a
/// date taken from the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSellerRecord {
    pub author: String,
    pub title: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BestSellerRecord {
    /// Creates a record from already-normalized fields
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            date: date.into(),
            category: None,
        }
    }

    /// Creates a record from raw catalog strings, normalizing author and title
    pub fn from_raw(
        raw_author: &str,
        raw_title: &str,
        date: &str,
        category: Option<&str>,
    ) -> Self {
        Self {
            author: normalize_author(raw_author),
            title: title_case(raw_title),
            date: date.to_string(),
            category: category.map(str::to_string),
        }
    }

    /// Sets the list category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the normalized (author, title) pair identifying this book
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::new(&self.author, &self.title)
    }
}

/// The normalized (author, title) pair used to deduplicate and join records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub author: String,
    pub title: String,
}

impl IdentityKey {
    pub fn new(author: &str, title: &str) -> Self {
        Self {
            author: normalize_author(author),
            title: title_case(title),
        }
    }
}

/// Ordered record collection with unique identity keys
///
/// Insertion order is preserved; a record whose identity key is already
/// present is rejected regardless of its date or category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordList {
    records: Vec<BestSellerRecord>,
    index: HashMap<IdentityKey, usize>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from existing records, keeping the first of any duplicates
    pub fn from_records(records: Vec<BestSellerRecord>) -> Self {
        let mut list = Self::new();
        for record in records {
            let key = record.identity_key();
            if !list.insert(record) {
                tracing::warn!(
                    "Dropping duplicate record '{}' by {} from loaded list",
                    key.title,
                    key.author
                );
            }
        }
        list
    }

    /// Appends the record unless its identity key is already present
    ///
    /// Returns true if the record was appended.
    pub fn insert(&mut self, record: BestSellerRecord) -> bool {
        let key = record.identity_key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.records.len());
        self.records.push(record);
        true
    }

    /// Looks up the record carrying the given identity key
    pub fn get(&self, key: &IdentityKey) -> Option<&BestSellerRecord> {
        self.index.get(key).map(|&position| &self.records[position])
    }

    pub fn as_slice(&self) -> &[BestSellerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
