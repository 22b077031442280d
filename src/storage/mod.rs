//! Storage module for persisting harvest state
//!
//! This module handles loading and checkpointing the aggregate crawl state:
//! - The `StateStore` contract the crawl core depends on
//! - A JSON file store with atomic replace-on-save
//! - An in-memory store that keeps every checkpoint it receives

mod json;
mod memory;
mod traits;

pub use json::{JsonStateStore, PersistedState};
pub use memory::MemoryStateStore;
pub use traits::{StateError, StateResult, StateStore};
