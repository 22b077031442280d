//! Integration tests for the paginated crawler
//!
//! These tests use wiremock to stand in for the catalog API and drive
//! single-resource crawls end-to-end against an in-memory state store.

mod common;

use bestseller_harvest::crawler::{PaginatedCrawler, Resource};
use bestseller_harvest::record::BestSellerRecord;
use bestseller_harvest::state::{CrawlCursor, CrawlState};
use bestseller_harvest::storage::MemoryStateStore;
use bestseller_harvest::HarvestError;
use common::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_cursor_chain_followed_to_exhaustion() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    mount_overview(
        &server,
        "2008-06-07",
        overview_body(vec![book("THE FIRST BOOK", "by Jane Doe")], "2008-06-14"),
        1,
    )
    .await;
    mount_overview(
        &server,
        "2008-06-14",
        overview_body(vec![book("a second book", "by John Roe")], "2008-06-21"),
        1,
    )
    .await;
    mount_overview(
        &server,
        "2008-06-21",
        overview_body(vec![book("Third", "Ann Author")], ""),
        1,
    )
    .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let report = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .expect("Crawl failed");

    assert_eq!(report.rounds(), 3);
    assert_eq!(report.cursors, vec!["2008-06-07", "2008-06-14", "2008-06-21"]);
    assert_eq!(report.added, 3);
    assert_eq!(state.number_ones_cursor, CrawlCursor::Exhausted);

    // Records carry the queried cursor as their date, normalized
    assert_eq!(
        state.number_ones.as_slice(),
        &[
            BestSellerRecord::new("Jane Doe", "The First Book", "2008-06-07"),
            BestSellerRecord::new("John Roe", "A Second Book", "2008-06-14"),
            BestSellerRecord::new("Ann Author", "Third", "2008-06-21"),
        ]
    );
}

#[tokio::test]
async fn test_checkpoint_after_every_round() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    mount_overview(
        &server,
        "2008-06-07",
        overview_body(vec![book("One", "by A")], "2008-06-14"),
        1,
    )
    .await;
    mount_overview(
        &server,
        "2008-06-14",
        overview_body(vec![book("Two", "by B")], ""),
        1,
    )
    .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let report = crawler.run(&mut client, &mut state, &mut store).await.unwrap();

    assert_eq!(store.save_count(), report.rounds());

    let first = &store.snapshots()[0];
    assert_eq!(first.number_ones.len(), 1);
    assert_eq!(
        first.number_ones_cursor,
        CrawlCursor::At("2008-06-14".to_string())
    );

    let last = &store.snapshots()[1];
    assert_eq!(last.number_ones.len(), 2);
    assert_eq!(last.number_ones_cursor, CrawlCursor::Exhausted);
}

#[tokio::test]
async fn test_duplicates_skipped_within_and_across_runs() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    // The same title shows up again the following week, spelled differently
    mount_overview(
        &server,
        "2008-06-07",
        overview_body(vec![book("THE BOOK", "by Jane Doe")], "2008-06-14"),
        2,
    )
    .await;
    mount_overview(
        &server,
        "2008-06-14",
        overview_body(
            vec![book("the book", "Jane Doe"), book("Another", "by John Roe")],
            "",
        ),
        2,
    )
    .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let report = crawler.run(&mut client, &mut state, &mut store).await.unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(report.duplicates, 1);
    let after_first = state.number_ones.clone();

    // Re-crawl the same pages from scratch: nothing new is appended
    state.number_ones_cursor = CrawlCursor::NotStarted;
    let report = crawler.run(&mut client, &mut state, &mut store).await.unwrap();

    assert_eq!(report.added, 0);
    assert_eq!(report.duplicates, 3);
    assert_eq!(state.number_ones, after_first);
    assert_eq!(state.number_ones.as_slice()[0].date, "2008-06-07");
}

#[tokio::test]
async fn test_audio_round_fans_out_over_categories() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    mount_audio(
        &server,
        "2018-03-11",
        "Fiction",
        category_body(vec![book("A Novel", "by Jane Doe")], "2018-03-18"),
        1,
    )
    .await;
    mount_audio(
        &server,
        "2018-03-11",
        "Nonfiction",
        category_body(vec![book("Some Facts", "by John Roe")], "2018-03-18"),
        1,
    )
    .await;
    mount_audio(
        &server,
        "2018-03-18",
        "Fiction",
        category_body(vec![], ""),
        1,
    )
    .await;
    mount_audio(
        &server,
        "2018-03-18",
        "Nonfiction",
        category_body(vec![], ""),
        1,
    )
    .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(
        Resource::audio(vec!["Fiction".to_string(), "Nonfiction".to_string()]),
        "2018-03-11",
    );

    let report = crawler.run(&mut client, &mut state, &mut store).await.unwrap();

    assert_eq!(report.rounds(), 2);
    assert_eq!(report.requests, 4);
    assert_eq!(store.save_count(), 2);
    assert_eq!(state.audio_cursor, CrawlCursor::Exhausted);
    assert_eq!(
        state.audio_best_sellers.as_slice(),
        &[
            BestSellerRecord::new("Jane Doe", "A Novel", "2018-03-11").with_category("Fiction"),
            BestSellerRecord::new("John Roe", "Some Facts", "2018-03-11")
                .with_category("Nonfiction"),
        ]
    );
}

#[tokio::test]
async fn test_resume_from_stored_cursor() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    mount_overview(
        &server,
        "2008-06-07",
        overview_body(vec![book("Never", "by Fetched")], "2008-06-14"),
        0,
    )
    .await;
    mount_overview(
        &server,
        "2008-06-14",
        overview_body(vec![book("Resumed", "by Jane Doe")], ""),
        1,
    )
    .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    state.number_ones_cursor = CrawlCursor::At("2008-06-14".to_string());
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let report = crawler.run(&mut client, &mut state, &mut store).await.unwrap();

    assert_eq!(report.cursors, vec!["2008-06-14"]);
    assert_eq!(state.number_ones.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_protocol_fault() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("GET"))
        .and(path("/lists/overview.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let err = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, HarvestError::Protocol { status, .. } if status.as_u16() == 500),
        "unexpected error: {:?}",
        err
    );
    assert!(err.is_protocol_fault());
    assert!(!err.is_retryable());
    assert!(!err.to_string().contains(API_KEY));
    assert_eq!(state.number_ones_cursor, CrawlCursor::NotStarted);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_non_json_body_is_protocol_fault() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    Mock::given(method("GET"))
        .and(path("/lists/overview.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Service Unavailable</body></html>"),
        )
        .mount(&server)
        .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let err = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::MalformedBody { .. }), "{:?}", err);
    assert!(err.is_protocol_fault());
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_missing_field_is_schema_fault() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    // Valid JSON without next_published_date
    Mock::given(method("GET"))
        .and(path("/lists/overview.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": { "lists": [] }
        })))
        .mount(&server)
        .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let err = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Schema { .. }), "{:?}", err);
    assert!(err.is_schema_fault());
    assert!(!err.to_string().contains(API_KEY));
    assert_eq!(state.number_ones_cursor, CrawlCursor::NotStarted);
}

#[tokio::test]
async fn test_book_without_author_is_schema_fault() {
    let server = MockServer::start().await;
    let config = test_config(&server);

    mount_audio(
        &server,
        "2018-03-11",
        "Fiction",
        category_body(vec![json!({ "title": "Anonymous", "author": "", "contributor": null })], ""),
        1,
    )
    .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::audio(vec!["Fiction".to_string()]), "2018-03-11");

    let err = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::MissingAuthor { .. }), "{:?}", err);
    assert!(err.is_schema_fault());
    assert!(state.audio_best_sellers.is_empty());
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_transport_fault_retried_through_limiter() {
    let mut config = test_config(&MockServer::start().await);
    // Nothing listens on the discard port
    config.api.base_url = "http://127.0.0.1:9".to_string();
    config.api.transport_retries = 1;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let err = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Transport { .. }), "{:?}", err);
    assert!(err.is_retryable());
    assert!(!err.to_string().contains(API_KEY));
    assert_eq!(client.limiter().window().len(), 2);
    assert_eq!(store.save_count(), 0);
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.api.transport_retries = 2;

    Mock::given(method("GET"))
        .and(path("/lists/overview.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let err = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .unwrap_err();

    assert!(err.is_protocol_fault(), "{:?}", err);
    assert_eq!(client.limiter().window().len(), 1);
}

#[tokio::test]
async fn test_schema_fault_not_retried() {
    let server = MockServer::start().await;
    let mut config = test_config(&server);
    config.api.transport_retries = 2;

    Mock::given(method("GET"))
        .and(path("/lists/overview.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": { "lists": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = test_client(&config);
    let mut state = CrawlState::new();
    let mut store = MemoryStateStore::new();
    let crawler = PaginatedCrawler::new(Resource::NumberOnes, "2008-06-07");

    let err = crawler
        .run(&mut client, &mut state, &mut store)
        .await
        .unwrap_err();

    assert!(err.is_schema_fault(), "{:?}", err);
    assert_eq!(client.limiter().window().len(), 1);
}
