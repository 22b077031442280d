use crate::config::types::{ApiConfig, Config, CrawlConfig, OutputConfig, RateLimitConfig};
use crate::ConfigError;
use chrono::NaiveDate;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_rate_limit_config(&config.rate_limit)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates API connection settings
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Upper bound on calls admitted per window
pub const MAX_CALLS_LIMIT: usize = 10_000;

/// Validates sliding-window limits
fn validate_rate_limit_config(config: &RateLimitConfig) -> Result<(), ConfigError> {
    if config.max_calls < 1 || config.max_calls > MAX_CALLS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_calls must be between 1 and {}, got {}",
            MAX_CALLS_LIMIT, config.max_calls
        )));
    }

    if config.period_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "period_secs must be >= 1, got {}",
            config.period_secs
        )));
    }

    Ok(())
}

/// Validates crawl start dates and categories
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_start_date("number_ones_start", &config.number_ones_start)?;
    validate_start_date("audio_start", &config.audio_start)?;

    if config.audio_categories.is_empty() {
        return Err(ConfigError::Validation(
            "audio_categories must contain at least one category".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in &config.audio_categories {
        if category.trim().is_empty() {
            return Err(ConfigError::Validation(
                "audio_categories cannot contain blank labels".to_string(),
            ));
        }
        if !seen.insert(category.as_str()) {
            return Err(ConfigError::Validation(format!(
                "audio category '{}' is listed more than once",
                category
            )));
        }
    }

    Ok(())
}

/// Start dates double as the first cursor, so they must be zero-padded ISO dates
fn validate_start_date(field: &str, value: &str) -> Result<(), ConfigError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .filter(|date| date.format("%Y-%m-%d").to_string() == value)
        .map(|_| ())
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "{} must be an ISO-8601 calendar date (YYYY-MM-DD), got '{}'",
                field, value
            ))
        })
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.state_path.is_empty() {
        return Err(ConfigError::Validation(
            "state_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
