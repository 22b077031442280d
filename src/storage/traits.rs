//! Storage traits and error types
//!
//! This module defines the trait interface for state store backends and
//! associated error types.

use crate::state::CrawlState;
use thiserror::Error;

/// Errors that can occur during state store operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to persist state file {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for state store operations
pub type StateResult<T> = Result<T, StateError>;

/// Trait for state store implementations
///
/// The crawl core loads the aggregate state once at start and hands the
/// whole aggregate back after every mutation. Implementations decide the
/// persisted shape; the in-memory shape is always `CrawlState`.
pub trait StateStore {
    /// Loads the persisted state, or an empty state if nothing was saved yet
    fn load(&self) -> StateResult<CrawlState>;

    /// Replaces the persisted state with the given snapshot
    ///
    /// Called after every page fetched and once more after the merge.
    fn save(&mut self, state: &CrawlState) -> StateResult<()>;
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn load(&self) -> StateResult<CrawlState> {
        (**self).load()
    }

    fn save(&mut self, state: &CrawlState) -> StateResult<()> {
        (**self).save(state)
    }
}
