//! State module for tracking harvest progress
//!
//! This module provides the aggregate state that is loaded once per run,
//! mutated by each crawl phase, and checkpointed after every page.
//!
//! # Components
//!
//! - `CrawlCursor`: the resumable pagination checkpoint of one resource
//! - `CrawlState`: both harvested lists, their cursors, and the derived reading list

mod crawl_state;
mod cursor;

// Re-export main types
pub use crawl_state::CrawlState;
pub use cursor::CrawlCursor;
