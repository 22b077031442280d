//! Harvest coordinator - main pipeline orchestration
//!
//! This module owns the crawl state for a whole run and drives the phases
//! in a fixed order:
//! - Number ones, crawled to exhaustion
//! - Audio best sellers, crawled to exhaustion
//! - Merge of both lists into the reading list
//!
//! Each phase is also callable on its own.

use crate::config::Config;
use crate::crawler::fetcher::ApiClient;
use crate::crawler::paginator::{CrawlReport, PaginatedCrawler};
use crate::crawler::resource::Resource;
use crate::output::{merge_reading_list, HarvestSummary};
use crate::state::CrawlState;
use crate::storage::StateStore;
use crate::Result;
use std::fmt;

/// Pipeline phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NumberOnes,
    AudioBestSellers,
    Merge,
    Done,
}

impl Phase {
    /// The phase that runs after this one
    pub fn next(self) -> Self {
        match self {
            Self::NumberOnes => Self::AudioBestSellers,
            Self::AudioBestSellers => Self::Merge,
            Self::Merge | Self::Done => Self::Done,
        }
    }

    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NumberOnes => "number ones",
            Self::AudioBestSellers => "audio best sellers",
            Self::Merge => "merge",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Main harvest coordinator structure
pub struct Harvester<S: StateStore> {
    client: ApiClient,
    store: S,
    state: CrawlState,
    number_ones: PaginatedCrawler,
    audio: PaginatedCrawler,
    phase: Phase,
    summary: HarvestSummary,
}

impl<S: StateStore> Harvester<S> {
    /// Creates a harvester, loading the state from `store`
    pub fn new(config: &Config, client: ApiClient, store: S) -> Result<Self> {
        let state = store.load()?;
        Ok(Self::with_state(config, client, store, state))
    }

    /// Creates a harvester starting from an explicit state
    ///
    /// Used for fresh runs that ignore whatever the store holds.
    pub fn with_state(config: &Config, client: ApiClient, store: S, state: CrawlState) -> Self {
        let number_ones = PaginatedCrawler::new(
            Resource::NumberOnes,
            Resource::NumberOnes.epoch(&config.crawl),
        );
        let audio_resource = Resource::audio_from_config(&config.crawl);
        let audio_epoch = audio_resource.epoch(&config.crawl).to_string();
        let audio = PaginatedCrawler::new(audio_resource, audio_epoch);

        Self {
            client,
            store,
            state,
            number_ones,
            audio,
            phase: Phase::NumberOnes,
            summary: HarvestSummary::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn summary(&self) -> &HarvestSummary {
        &self.summary
    }

    pub fn into_parts(self) -> (CrawlState, S) {
        (self.state, self.store)
    }

    /// Runs every remaining phase in order
    pub async fn run(&mut self) -> Result<HarvestSummary> {
        while !self.phase.is_done() {
            self.step().await?;
        }
        Ok(self.summary.clone())
    }

    /// Runs the current phase and advances to the next one
    ///
    /// On error the phase is not advanced, so calling `step` again resumes
    /// from the last checkpoint.
    pub async fn step(&mut self) -> Result<Phase> {
        tracing::debug!("Entering phase: {}", self.phase);
        match self.phase {
            Phase::NumberOnes => {
                self.summary.number_ones = self.crawl_number_ones().await?;
            }
            Phase::AudioBestSellers => {
                self.summary.audio_best_sellers = self.crawl_audio_best_sellers().await?;
            }
            Phase::Merge => {
                self.build_reading_list()?;
            }
            Phase::Done => {}
        }
        self.phase = self.phase.next();
        Ok(self.phase)
    }

    /// Crawls the number-one overview to exhaustion
    pub async fn crawl_number_ones(&mut self) -> Result<CrawlReport> {
        self.number_ones
            .run(&mut self.client, &mut self.state, &mut self.store)
            .await
    }

    /// Crawls the audio best-seller lists to exhaustion
    pub async fn crawl_audio_best_sellers(&mut self) -> Result<CrawlReport> {
        self.audio
            .run(&mut self.client, &mut self.state, &mut self.store)
            .await
    }

    /// Recomputes the reading list and checkpoints it
    ///
    /// # Returns
    ///
    /// The number of titles on the reading list
    pub fn build_reading_list(&mut self) -> Result<usize> {
        self.state.reading_list = merge_reading_list(
            &self.state.number_ones,
            self.state.audio_best_sellers.as_slice(),
        );
        self.store.save(&self.state)?;

        let count = self.state.reading_list.len();
        self.summary.reading_list = count;
        tracing::info!("Reading list holds {} titles", count);
        Ok(count)
    }
}
