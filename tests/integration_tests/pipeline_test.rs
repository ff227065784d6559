//! Full sync through the real catalog client

use std::collections::HashSet;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use boatsync::app::App;
use boatsync::models::BoatId;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{catalog_url, mount_catalog, page_body, test_config};

fn app_for(server: &MockServer, page_size: usize) -> App {
    let mut config = test_config(page_size);
    config.catalog.base_url = catalog_url(server);
    App::from_config(config).unwrap()
}

#[tokio::test]
async fn test_sync_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 120, 50).await;

    let app = app_for(&mock_server, 50);
    let report = app.query().refresh().unwrap().wait().await.unwrap();

    assert_eq!(report.pages_requested, 3);
    assert_eq!(report.cached(), 120);

    let ids: HashSet<BoatId> = app
        .query()
        .list_cached()
        .iter()
        .filter_map(|b| b.id())
        .collect();
    assert_eq!(ids.len(), 120);

    // One request per offset
    mock_server.verify().await;
}

#[tokio::test]
async fn test_filters_forwarded_on_every_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/boats"))
        .and(query_param("yearFrom", "2015"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0..10, 15)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/boats"))
        .and(query_param("yearFrom", "2015"))
        .and(query_param("start", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(10..15, 15)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(10);
    config.catalog.base_url = catalog_url(&mock_server);
    config.sync.filters.year_from = Some(2015);
    let app = App::from_config(config).unwrap();

    let report = app.query().refresh().unwrap().wait().await.unwrap();
    assert_eq!(report.cached(), 15);
    assert!(report.skipped.is_empty());
}

/// The catalog reports more items than it serves; the empty page ends the run
#[tokio::test]
async fn test_overstated_total_stops_on_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0..50, 500)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body([], 500)))
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server, 50);
    let report = app.query().refresh().unwrap().wait().await.unwrap();

    assert!(report.stopped_early);
    assert_eq!(report.pages_requested, 2);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
    assert_eq!(report.cached(), 50);
}

#[tokio::test]
async fn test_http_api_over_synced_cache() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 30, 50).await;
    Mock::given(method("GET"))
        .and(path("/v2/boats/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"BoatID": 7, "Beam": 4.2})),
        )
        .mount(&mock_server)
        .await;

    let app = app_for(&mock_server, 50);
    app.query().refresh().unwrap().wait().await.unwrap();
    let router = app.server().unwrap().build_router();

    let response = router
        .clone()
        .oneshot(Request::get("/api/boats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let boats: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(boats.len(), 30);

    let response = router
        .oneshot(Request::get("/api/boats/7").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let boat: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(boat["Beam"], 4.2);
}
