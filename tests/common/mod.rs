//! Common test utilities

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use boatsync::catalog::CatalogSource;
use boatsync::config::Config;
use boatsync::models::{Boat, CatalogFilters, Page};
use boatsync::utils::error::FetchError;
use serde_json::json;
use tokio::sync::Semaphore;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a boat with the given identifier
pub fn boat(id: usize) -> Boat {
    serde_json::from_value(json!({
        "BoatID": id,
        "Name": format!("Boat {id}"),
        "SellPrice": 100_000 + id * 1_000,
        "YearBuilt": 2000 + (id % 20),
    }))
    .unwrap()
}

/// Configuration with no page pacing and the given page size
pub fn test_config(page_size: usize) -> Config {
    let mut config = Config::default();
    config.sync.page_size = page_size;
    config.sync.page_delay_ms = 0;
    config
}

/// In-memory catalog with scripted failures
///
/// Boats are numbered `0..total`; a page at `offset` holds
/// `offset..min(offset + limit, total)`.
pub struct ScriptedCatalog {
    total: usize,
    failing_offsets: HashSet<usize>,
    empty_from: Option<usize>,
    gate: Option<Arc<Semaphore>>,
    requests: Mutex<Vec<usize>>,
}

impl ScriptedCatalog {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            failing_offsets: HashSet::new(),
            empty_from: None,
            gate: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail the page starting at `offset` with a 503
    pub fn failing_at(mut self, offset: usize) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    /// Return empty pages from `offset` on
    pub fn empty_from(mut self, offset: usize) -> Self {
        self.empty_from = Some(offset);
        self
    }

    /// Block every page request until a permit is added to `gate`
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Offsets requested so far, in order
    pub fn offsets(&self) -> Vec<usize> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        _filters: &CatalogFilters,
    ) -> Result<Page, FetchError> {
        self.requests.lock().unwrap().push(offset);

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        if self.failing_offsets.contains(&offset) {
            return Err(FetchError::Status(503));
        }
        if self.empty_from.is_some_and(|from| offset >= from) {
            return Ok(Page {
                items: Vec::new(),
                total_count: self.total,
            });
        }

        let end = (offset + limit).min(self.total);
        Ok(Page {
            items: (offset..end).map(boat).collect(),
            total_count: self.total,
        })
    }

    async fn fetch_detail(&self, id: &str) -> Result<Option<Boat>, FetchError> {
        match id.parse::<usize>() {
            Ok(n) if n < self.total => Ok(Some(boat(n))),
            Ok(_) => Ok(None),
            Err(_) => Err(FetchError::Status(500)),
        }
    }
}

/// Listing endpoint on a mock server
pub fn catalog_url(server: &MockServer) -> String {
    format!("{}/v2/boats", server.uri())
}

/// JSON body of one catalog page
pub fn page_body(ids: impl IntoIterator<Item = usize>, total: usize) -> serde_json::Value {
    let results: Vec<Boat> = ids.into_iter().map(boat).collect();
    json!({ "Results": results, "TotalResults": total })
}

/// Mount every page of a `total`-item catalog on `server`, each expected once
pub async fn mount_catalog(server: &MockServer, total: usize, page_size: usize) {
    let mut offset = 0;
    loop {
        let end = (offset + page_size).min(total);
        Mock::given(method("GET"))
            .and(path("/v2/boats"))
            .and(query_param("start", offset.to_string()))
            .and(query_param("limit", page_size.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(offset..end, total)))
            .expect(1)
            .mount(server)
            .await;

        offset += page_size;
        if offset >= total {
            break;
        }
    }
}
