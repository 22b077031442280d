//! Output module for the reading list and run summaries
//!
//! This module handles:
//! - Cross-referencing both harvested lists into the reading list
//! - Printing the reading list
//! - Recording per-phase harvest statistics

mod merge;
mod report;
pub mod stats;

pub use merge::merge_reading_list;
pub use report::{format_entry, print_reading_list, write_reading_list};
pub use stats::{print_summary, HarvestSummary};
