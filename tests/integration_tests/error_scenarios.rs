//! Error scenario integration tests
//!
//! Tests failure modes of a sync run against a real HTTP catalog:
//! 1. First page failures
//! 2. Failed and malformed middle pages
//! 3. Recovery on the next run

use std::time::Duration;

use boatsync::app::App;
use boatsync::error::{Error, ErrorCategory};
use boatsync::utils::error::{FetchError, FetchErrorKind, SyncError};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{boat, catalog_url, page_body, test_config};

fn app_for(server: &MockServer) -> App {
    let mut config = test_config(50);
    config.catalog.base_url = catalog_url(server);
    App::from_config(config).unwrap()
}

// ============================================================================
// Fatal Failures
// ============================================================================

#[tokio::test]
async fn test_first_page_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    app.state().set_boats(vec![boat(1)]);

    let err = app.query().refresh().unwrap().wait().await.unwrap_err();
    assert!(matches!(err, SyncError::FirstPage(FetchError::Status(500))));

    let err = Error::from(err);
    assert_eq!(err.category(), ErrorCategory::Network);
    assert!(err.is_recoverable());

    let status = app.query().status();
    assert!(!status.is_loading);
    assert_eq!(status.cache_size, 1);
}

#[tokio::test]
async fn test_first_page_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(0..1, 1))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut config = test_config(50);
    config.catalog.base_url = catalog_url(&mock_server);
    config.catalog.request_timeout_secs = 1;
    let app = App::from_config(config).unwrap();

    let err = app.query().refresh().unwrap().wait().await.unwrap_err();
    assert!(matches!(err, SyncError::FirstPage(FetchError::Timeout)));
    assert!(!app.query().status().is_loading);
}

// ============================================================================
// Soft Failures
// ============================================================================

#[tokio::test]
async fn test_malformed_middle_page_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0..50, 150)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"Results\": [tru"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("start", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(100..150, 150)))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let report = app.query().refresh().unwrap().wait().await.unwrap();

    assert_eq!(report.cached(), 100);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].offset, 50);
    assert_eq!(report.skipped[0].error.kind(), FetchErrorKind::Decode);
}

#[tokio::test]
async fn test_rate_limited_page_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0..50, 100)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);
    let report = app.query().refresh().unwrap().wait().await.unwrap();

    assert_eq!(report.cached(), 50);
    assert!(matches!(report.skipped[0].error, FetchError::Status(429)));
    assert!(report.skipped[0].error.is_recoverable());
}

// ============================================================================
// Recovery
// ============================================================================

/// A failed run leaves the service ready for the next trigger
#[tokio::test]
async fn test_next_run_recovers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0..5, 5)))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server);

    assert!(app.query().refresh().unwrap().wait().await.is_err());
    assert!(app.query().list_cached().is_empty());

    let report = app
        .query()
        .ensure_fresh_or_trigger()
        .unwrap()
        .wait()
        .await
        .unwrap();
    assert_eq!(report.cached(), 5);
}
