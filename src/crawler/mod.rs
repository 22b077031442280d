//! Crawler module for catalog list harvesting
//!
//! This module contains the core crawling logic, including:
//! - Sliding-window rate limiting
//! - Throttled HTTP fetching with fault classification
//! - Response parsing for both list resources
//! - Resumable cursor-driven pagination
//! - Overall pipeline coordination

mod coordinator;
mod fetcher;
mod paginator;
mod parser;
mod rate_limiter;
mod resource;

pub use coordinator::{Harvester, Phase};
pub use fetcher::{build_http_client, parse_body, redact, ApiClient};
pub use paginator::{CrawlReport, PaginatedCrawler};
pub use parser::{CategoryResults, Envelope, ListPage, OverviewList, OverviewResults, RawBook};
pub use rate_limiter::{RateLimiter, RateWindow};
pub use resource::{PageRequest, Resource, API_KEY_PARAM};

use crate::config::Config;
use crate::output::HarvestSummary;
use crate::state::CrawlState;
use crate::storage::StateStore;
use crate::Result;
use tokio_util::sync::CancellationToken;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Load the state from the store, or start empty when `fresh`
/// 2. Crawl the number ones to exhaustion
/// 3. Crawl the audio best sellers to exhaustion
/// 4. Merge both into the reading list
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `api_key` - The catalog API key
/// * `store` - The state store checkpoints are written to
/// * `fresh` - Ignore whatever state the store already holds
/// * `cancel` - Cancels long rate-limit waits
///
/// # Returns
///
/// * `Ok((HarvestSummary, CrawlState, S))` - Harvest completed, with the final state and the store
/// * `Err(HarvestError)` - Harvest aborted after its last checkpoint
pub async fn harvest<S: StateStore>(
    config: &Config,
    api_key: &str,
    store: S,
    fresh: bool,
    cancel: CancellationToken,
) -> Result<(HarvestSummary, CrawlState, S)> {
    let client = ApiClient::from_config(config, api_key, cancel)?;

    let mut harvester = if fresh {
        tracing::info!("Starting fresh harvest (ignoring previous state)");
        Harvester::with_state(config, client, store, CrawlState::new())
    } else {
        Harvester::new(config, client, store)?
    };

    let summary = harvester.run().await?;
    let (state, store) = harvester.into_parts();
    Ok((summary, state, store))
}
