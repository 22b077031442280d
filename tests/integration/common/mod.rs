//! Shared fixtures for the integration tests

#![allow(dead_code)]

use bestseller_harvest::config::{ApiConfig, Config, CrawlConfig, RateLimitConfig};
use bestseller_harvest::crawler::{ApiClient, RateLimiter};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "SECRET-KEY";

/// Configuration pointing at the mock server, with a single audio category
pub fn test_config(server: &MockServer) -> Config {
    Config {
        api: ApiConfig {
            base_url: server.uri(),
            transport_retries: 0,
            retry_delay_ms: 0,
            ..ApiConfig::default()
        },
        rate_limit: RateLimitConfig {
            max_calls: 100,
            period_secs: 60,
        },
        crawl: CrawlConfig {
            audio_categories: vec!["Fiction".to_string()],
            ..CrawlConfig::default()
        },
        ..Config::default()
    }
}

pub fn test_client(config: &Config) -> ApiClient {
    ApiClient::new(
        &config.api,
        RateLimiter::from_config(&config.rate_limit),
        API_KEY,
    )
    .expect("Failed to build client")
}

pub fn book(title: &str, contributor: &str) -> Value {
    json!({
        "title": title,
        "author": contributor.trim_start_matches("by "),
        "contributor": contributor,
    })
}

/// Overview body with one list per book; each book is that list's number one
pub fn overview_body(number_ones: Vec<Value>, next: &str) -> Value {
    let lists: Vec<Value> = number_ones
        .into_iter()
        .enumerate()
        .map(|(i, first)| {
            json!({
                "list_name": format!("List {}", i),
                "books": [first, book("RUNNER UP", "by Someone Else")],
            })
        })
        .collect();

    json!({
        "status": "OK",
        "results": {
            "published_date": "ignored",
            "next_published_date": next,
            "lists": lists,
        }
    })
}

pub fn category_body(books: Vec<Value>, next: &str) -> Value {
    json!({
        "status": "OK",
        "results": {
            "next_published_date": next,
            "books": books,
        }
    })
}

/// Mounts an overview page expected to be fetched exactly `times` times
pub async fn mount_overview(server: &MockServer, date: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path("/lists/overview.json"))
        .and(query_param("published_date", date))
        .and(query_param("api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts an audio category page expected to be fetched exactly `times` times
pub async fn mount_audio(server: &MockServer, date: &str, category: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/lists/{}/audio-{}.json", date, category)))
        .and(query_param("api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}
