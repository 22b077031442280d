//! Resumable cursor-driven pagination of one resource
//!
//! The crawler follows a resource's cursor chain until the source echoes an
//! empty `next_published_date`. Every round appends the records not already
//! present, advances the stored cursor, and checkpoints the whole state.

use crate::crawler::fetcher::{redact, ApiClient};
use crate::crawler::resource::Resource;
use crate::record::BestSellerRecord;
use crate::state::{CrawlCursor, CrawlState};
use crate::storage::StateStore;
use crate::{HarvestError, Result};

/// Outcome of crawling one resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Cursors queried, in order
    pub cursors: Vec<String>,

    /// HTTP requests issued (one per category per round)
    pub requests: usize,

    /// Records appended to the collection
    pub added: usize,

    /// Records skipped because their identity key was already present
    pub duplicates: usize,
}

impl CrawlReport {
    /// Number of pagination rounds (checkpoints) completed
    pub fn rounds(&self) -> usize {
        self.cursors.len()
    }
}

/// Drives one resource from its stored cursor to exhaustion
#[derive(Debug, Clone)]
pub struct PaginatedCrawler {
    resource: Resource,
    epoch: String,
}

impl PaginatedCrawler {
    /// Creates a crawler; `epoch` is queried when the resource was never crawled
    pub fn new(resource: Resource, epoch: impl Into<String>) -> Self {
        Self {
            resource,
            epoch: epoch.into(),
        }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Runs the crawl until the cursor is exhausted
    ///
    /// # Round
    ///
    /// 1. Build the round's request(s) from the current cursor
    /// 2. Fetch each page; normalize every book and append it unless its
    ///    identity key is already present, dated with the queried cursor
    /// 3. Store the last response's `next_published_date` as the cursor
    /// 4. Checkpoint the whole state
    ///
    /// A state whose cursor is already exhausted is returned untouched and
    /// no request is made.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The resource is exhausted
    /// * `Err(HarvestError)` - A fault aborted the crawl; every completed round is persisted
    pub async fn run<S: StateStore>(
        &self,
        client: &mut ApiClient,
        state: &mut CrawlState,
        store: &mut S,
    ) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();
        let name = self.resource.name();

        while let Some(cursor) = state
            .cursor(&self.resource)
            .query_date(&self.epoch)
            .map(str::to_string)
        {
            tracing::info!("Getting {} from {}", name, cursor);

            let requests = self
                .resource
                .page_requests(client.base_url(), client.api_key(), &cursor)?;

            let mut next_published_date = String::new();
            for request in requests {
                let page = self.resource.fetch_page(client, &request.url).await?;
                report.requests += 1;

                for book in &page.books {
                    let raw_author = book.raw_author().ok_or_else(|| HarvestError::MissingAuthor {
                        url: redact(&request.url),
                    })?;
                    let record = BestSellerRecord::from_raw(
                        raw_author,
                        &book.title,
                        &cursor,
                        request.category.as_deref(),
                    );

                    let title = record.title.clone();
                    if state.records_mut(&self.resource).insert(record) {
                        tracing::debug!("Added '{}' to {}", title, name);
                        report.added += 1;
                    } else {
                        tracing::debug!("Skipping '{}', already in {}", title, name);
                        report.duplicates += 1;
                    }
                }

                next_published_date = page.next_published_date;
            }

            state.set_cursor(&self.resource, CrawlCursor::from_next(&next_published_date));
            store.save(state)?;
            report.cursors.push(cursor);
        }

        if report.cursors.is_empty() {
            tracing::info!("{} already crawled to the end, nothing to fetch", name);
        } else {
            tracing::info!(
                "Finished {}: {} rounds, {} added, {} duplicates",
                name,
                report.rounds(),
                report.added,
                report.duplicates
            );
        }

        Ok(report)
    }
}
