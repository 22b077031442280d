//! Per-phase harvest statistics

use crate::crawler::CrawlReport;

/// Summary of one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    /// Outcome of the number-ones crawl
    pub number_ones: CrawlReport,

    /// Outcome of the audio best-sellers crawl
    pub audio_best_sellers: CrawlReport,

    /// Size of the recomputed reading list
    pub reading_list: usize,
}

impl HarvestSummary {
    /// Total HTTP requests issued across both crawls
    pub fn total_requests(&self) -> usize {
        self.number_ones.requests + self.audio_best_sellers.requests
    }

    /// Total records added across both crawls
    pub fn total_added(&self) -> usize {
        self.number_ones.added + self.audio_best_sellers.added
    }
}

/// Prints a harvest summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    println!("=== Harvest Summary ===\n");

    for (name, report) in [
        ("Number ones", &summary.number_ones),
        ("Audio best sellers", &summary.audio_best_sellers),
    ] {
        println!("{}:", name);
        println!("  Rounds: {}", report.rounds());
        println!("  Requests: {}", report.requests);
        println!("  Records added: {}", report.added);
        println!("  Duplicates skipped: {}", report.duplicates);
        if let Some(last) = report.cursors.last() {
            println!("  Last date queried: {}", last);
        }
        println!();
    }

    println!("Reading list: {} titles", summary.reading_list);
    println!("Total requests: {}", summary.total_requests());
}
