//! The two list resources of the catalog API
//!
//! A resource knows how to build its page URLs from a cursor, which
//! categories it fans out over, and how to read its response body.

use crate::config::CrawlConfig;
use crate::crawler::fetcher::ApiClient;
use crate::crawler::parser::{CategoryResults, Envelope, ListPage, OverviewResults};
use crate::Result;
use url::Url;

/// Query parameter carrying the API key
pub const API_KEY_PARAM: &str = "api-key";

/// A paginated list resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Weekly overview of every list; the first book of each list is a number one
    NumberOnes,

    /// Audio best-seller lists, one request per category for every cursor
    AudioBestSellers { categories: Vec<String> },
}

/// One request of a pagination round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub category: Option<String>,
    pub url: Url,
}

impl Resource {
    pub fn audio(categories: Vec<String>) -> Self {
        Self::AudioBestSellers { categories }
    }

    pub fn audio_from_config(config: &CrawlConfig) -> Self {
        Self::audio(config.audio_categories.clone())
    }

    /// Human-readable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::NumberOnes => "number ones",
            Self::AudioBestSellers { .. } => "audio best sellers",
        }
    }

    /// The cursor a never-crawled resource starts from
    pub fn epoch<'a>(&self, config: &'a CrawlConfig) -> &'a str {
        match self {
            Self::NumberOnes => &config.number_ones_start,
            Self::AudioBestSellers { .. } => &config.audio_start,
        }
    }

    /// Builds every request of the round for `cursor`
    ///
    /// Categories share the cursor; they are not a separate pagination axis.
    pub fn page_requests(
        &self,
        base: &Url,
        api_key: &str,
        cursor: &str,
    ) -> Result<Vec<PageRequest>> {
        let base = base.as_str().trim_end_matches('/');
        match self {
            Self::NumberOnes => {
                let mut url = Url::parse(&format!("{}/lists/overview.json", base))?;
                url.query_pairs_mut()
                    .append_pair("published_date", cursor)
                    .append_pair(API_KEY_PARAM, api_key);
                Ok(vec![PageRequest {
                    category: None,
                    url,
                }])
            }
            Self::AudioBestSellers { categories } => categories
                .iter()
                .map(|category| -> Result<PageRequest> {
                    let mut url = Url::parse(&format!(
                        "{}/lists/{}/audio-{}.json",
                        base, cursor, category
                    ))?;
                    url.query_pairs_mut().append_pair(API_KEY_PARAM, api_key);
                    Ok(PageRequest {
                        category: Some(category.clone()),
                        url,
                    })
                })
                .collect(),
        }
    }

    /// Fetches and parses one page of this resource
    pub async fn fetch_page(&self, client: &mut ApiClient, url: &Url) -> Result<ListPage> {
        let page: ListPage = match self {
            Self::NumberOnes => client
                .fetch::<Envelope<OverviewResults>>(url)
                .await?
                .results
                .into(),
            Self::AudioBestSellers { .. } => client
                .fetch::<Envelope<CategoryResults>>(url)
                .await?
                .results
                .into(),
        };
        Ok(page)
    }
}
