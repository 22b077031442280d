use crate::crawler::Resource;
use crate::record::{BestSellerRecord, RecordList};
use crate::state::CrawlCursor;

/// Aggregate harvest state
///
/// The two source lists accumulate monotonically across runs. The reading
/// list is derived and fully recomputed by every merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlState {
    /// Number-one titles across all overview lists
    pub number_ones: RecordList,

    /// Audio best-sellers, each tagged with its category
    pub audio_best_sellers: RecordList,

    /// Titles present in both lists
    pub reading_list: Vec<BestSellerRecord>,

    /// Resume point of the number-ones crawl
    pub number_ones_cursor: CrawlCursor,

    /// Resume point of the audio crawl
    pub audio_cursor: CrawlCursor,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self, resource: &Resource) -> &CrawlCursor {
        match resource {
            Resource::NumberOnes => &self.number_ones_cursor,
            Resource::AudioBestSellers { .. } => &self.audio_cursor,
        }
    }

    pub fn set_cursor(&mut self, resource: &Resource, cursor: CrawlCursor) {
        match resource {
            Resource::NumberOnes => self.number_ones_cursor = cursor,
            Resource::AudioBestSellers { .. } => self.audio_cursor = cursor,
        }
    }

    /// The collection a resource's records are appended to
    pub fn records(&self, resource: &Resource) -> &RecordList {
        match resource {
            Resource::NumberOnes => &self.number_ones,
            Resource::AudioBestSellers { .. } => &self.audio_best_sellers,
        }
    }

    pub fn records_mut(&mut self, resource: &Resource) -> &mut RecordList {
        match resource {
            Resource::NumberOnes => &mut self.number_ones,
            Resource::AudioBestSellers { .. } => &mut self.audio_best_sellers,
        }
    }

    /// Returns true once both resources have been crawled to exhaustion
    pub fn is_fully_crawled(&self) -> bool {
        self.number_ones_cursor.is_exhausted() && self.audio_cursor.is_exhausted()
    }
}
