//! Throttled catalog API client
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the HTTP client with timeouts and user agent
//! - Admitting every request through the owned rate limiter
//! - Classifying failures into transport, protocol and schema faults
//! - Bounded retry of transport faults only

use crate::config::{ApiConfig, Config};
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::resource::API_KEY_PARAM;
use crate::{HarvestError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The API connection configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Renders a URL for logs and errors with the API key removed
pub fn redact(url: &Url) -> String {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != API_KEY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut redacted = url.clone();
    if kept.is_empty() {
        redacted.set_query(None);
    } else {
        redacted.query_pairs_mut().clear().extend_pairs(kept);
    }
    redacted.to_string()
}

/// Parses a response body, classifying JSON errors
///
/// Syntax errors are protocol faults (the body is not what the API promises);
/// data errors are schema faults (valid JSON missing an expected field).
pub fn parse_body<T: DeserializeOwned>(body: &str, url: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| match source.classify() {
        Category::Data => HarvestError::Schema {
            url: url.to_string(),
            source,
        },
        Category::Io | Category::Syntax | Category::Eof => HarvestError::MalformedBody {
            url: url.to_string(),
            source,
        },
    })
}

/// Client for the catalog API
///
/// Issues one throttled GET per call and parses the body. Only transport
/// faults are retried, and only a bounded number of times.
pub struct ApiClient {
    client: Client,
    limiter: RateLimiter,
    base_url: Url,
    api_key: String,
    transport_retries: u32,
    retry_delay: Duration,
}

impl ApiClient {
    /// Creates a client that owns the given rate limiter
    pub fn new(
        config: &ApiConfig,
        limiter: RateLimiter,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            limiter,
            base_url: Url::parse(&config.base_url)?,
            api_key: api_key.into(),
            transport_retries: config.transport_retries,
            retry_delay: config.retry_delay(),
        })
    }

    /// Builds a client with its own rate limiter, cancelled through `cancel`
    pub fn from_config(
        config: &Config,
        api_key: impl Into<String>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let limiter = RateLimiter::from_config(&config.rate_limit).with_cancellation(cancel);
        Self::new(&config.api, limiter, api_key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Fetches a URL and parses its JSON body into `T`
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The parsed body
    /// * `Err(HarvestError::Transport)` - Connection failure or timeout, after retries
    /// * `Err(HarvestError::Protocol)` / `Err(HarvestError::MalformedBody)` - Bad status or body
    /// * `Err(HarvestError::Schema)` - Body lacks an expected field
    /// * `Err(HarvestError::Cancelled)` - Cancelled while waiting for the rate limiter
    pub async fn fetch<T: DeserializeOwned>(&mut self, url: &Url) -> Result<T> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Err(e) if e.is_retryable() && attempt < self.transport_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "{} (retry {}/{} in {:?})",
                        e,
                        attempt,
                        self.transport_retries,
                        self.retry_delay
                    );
                    self.pause_before_retry().await?;
                }
                result => return result,
            }
        }
    }

    async fn fetch_once<T: DeserializeOwned>(&mut self, url: &Url) -> Result<T> {
        self.limiter.acquire().await?;

        // reqwest errors embed the full URL, key included; they are stripped below
        let display_url = redact(url);
        tracing::debug!("GET {}", display_url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| HarvestError::Transport {
                url: display_url.clone(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Protocol {
                url: display_url,
                status,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| HarvestError::Transport {
                url: display_url.clone(),
                source: source.without_url(),
            })?;

        parse_body(&body, &display_url)
    }

    async fn pause_before_retry(&self) -> Result<()> {
        tokio::select! {
            _ = tokio::time::sleep(self.retry_delay) => Ok(()),
            _ = self.limiter.cancellation().cancelled() => Err(HarvestError::Cancelled),
        }
    }
}
