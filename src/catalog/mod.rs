//! Remote catalog access
//!
//! This module implements everything that talks to the remote boat catalog:
//! single page requests, the pagination loop that walks a whole catalog, and
//! identifier-based deduplication of the accumulated results.

pub mod client;
pub mod dedup;
pub mod pager;

use async_trait::async_trait;

use crate::models::{Boat, CatalogFilters, Page};
use crate::utils::error::FetchError;

pub use client::CatalogClient;
pub use dedup::{dedupe, dedupe_with_stats, DedupStats};
pub use pager::{PaginatedRun, Paginator, SkippedPage};

/// A paginated source of boat listings
///
/// Implementations issue exactly one request per call and never retry;
/// retry policy belongs to the caller.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch `limit` items starting at `offset`
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        filters: &CatalogFilters,
    ) -> Result<Page, FetchError>;

    /// Fetch a single listing by identifier
    ///
    /// Returns `Ok(None)` when the catalog has no such listing.
    async fn fetch_detail(&self, id: &str) -> Result<Option<Boat>, FetchError>;
}
