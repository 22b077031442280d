//! Bestseller-Harvest: an incremental best-seller list harvester
//!
//! This crate crawls two best-seller lists from a rate-limited catalog API,
//! resuming from persisted cursors, deduplicating entries across runs, and
//! cross-referencing both lists into a derived reading list.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for harvest operations
///
/// Transport, protocol and schema faults are never recovered inside a crawl
/// phase. They propagate to the caller, which exits having persisted every
/// page completed so far.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Protocol {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response body from {url}: {source}")]
    MalformedBody {
        url: String,
        source: serde_json::Error,
    },

    #[error("Response from {url} does not match the expected schema: {source}")]
    Schema {
        url: String,
        source: serde_json::Error,
    },

    #[error("Book entry from {url} has neither a contributor nor an author")]
    MissingAuthor { url: String },

    #[error("State store error: {0}")]
    State(#[from] storage::StateError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Crawl cancelled")]
    Cancelled,
}

impl HarvestError {
    /// Returns true for faults that a repeated request could plausibly fix
    ///
    /// Only transport failures qualify. Protocol and schema faults mean the
    /// request/response contract is broken and retrying cannot help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true for schema faults (body parsed but fields are missing)
    pub fn is_schema_fault(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::MissingAuthor { .. })
    }

    /// Returns true for protocol faults (bad status or unparsable body)
    pub fn is_protocol_fault(&self) -> bool {
        matches!(self, Self::Protocol { .. } | Self::MalformedBody { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ApiClient, Harvester, PaginatedCrawler, RateLimiter, Resource};
pub use output::merge_reading_list;
pub use record::{normalize_author, title_case, BestSellerRecord, IdentityKey, RecordList};
pub use state::{CrawlCursor, CrawlState};
pub use storage::{JsonStateStore, MemoryStateStore, StateStore};
