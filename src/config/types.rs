use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Bestseller-Harvest
///
/// Every section is optional; a missing section falls back to the defaults
/// matching the public catalog API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default, rename = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Catalog API connection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Base URL the list resources hang off
    pub base_url: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// How many times a transport failure is retried before giving up
    pub transport_retries: u32,

    /// Delay between transport retries (milliseconds)
    pub retry_delay_ms: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.nytimes.com/svc/books/v3".to_string(),
            api_key_env: "NYT_API_KEY".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("bestseller-harvest/{}", env!("CARGO_PKG_VERSION")),
            transport_retries: 2,
            retry_delay_ms: 5000,
        }
    }
}

/// Sliding-window admission limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RateLimitConfig {
    /// Maximum calls admitted within one window
    pub max_calls: usize,

    /// Window length (seconds)
    pub period_secs: u64,
}

impl RateLimitConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_calls: 10,
            period_secs: 60,
        }
    }
}

/// Crawl starting points and category set
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Earliest published date of the number-one overview
    pub number_ones_start: String,

    /// Earliest published date of the audio best-seller lists
    pub audio_start: String,

    /// Category labels fetched for every audio cursor
    pub audio_categories: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            number_ones_start: "2008-06-07".to_string(),
            audio_start: "2018-03-11".to_string(),
            audio_categories: vec!["Fiction".to_string(), "Nonfiction".to_string()],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the JSON state file
    pub state_path: String,

    /// Print the reading list to stdout after the merge
    pub print_reading_list: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            state_path: "best_sellers.json".to_string(),
            print_reading_list: true,
        }
    }
}
