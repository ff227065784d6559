//! Catalog pagination with pacing and soft failures
//!
//! This module walks a whole catalog one page at a time. The total reported
//! by the first page fixes how many pages are requested; later pages that
//! fail are skipped and recorded, and an empty page ends paging early.

use std::sync::Arc;
use std::time::Duration;

use crate::metrics;
use crate::models::{Boat, CatalogFilters};
use crate::utils::error::FetchError;
use crate::utils::page_count;

use super::CatalogSource;

/// Default number of items requested per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Default pause before each page after the first
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

/// A page that failed and was left out of the run
#[derive(Debug)]
pub struct SkippedPage {
    /// 1-based page number
    pub page: usize,

    /// Offset the page was requested at
    pub offset: usize,

    /// Why the page failed
    pub error: FetchError,
}

/// Everything a completed pagination pass produced
#[derive(Debug, Default)]
pub struct PaginatedRun {
    /// Accumulated items in fetch order, not deduplicated
    pub items: Vec<Boat>,

    /// Total reported by the first page
    pub epoch_total: usize,

    /// Number of page requests issued, including failed ones
    pub pages_requested: usize,

    /// Pages that failed after the first
    pub skipped: Vec<SkippedPage>,

    /// Whether an empty page ended paging before the computed page count
    pub stopped_early: bool,
}

impl PaginatedRun {
    /// Number of pages that returned data
    pub fn pages_succeeded(&self) -> usize {
        self.pages_requested - self.skipped.len()
    }
}

/// Walks a catalog page by page
pub struct Paginator {
    source: Arc<dyn CatalogSource>,
    page_size: usize,
    page_delay: Duration,
}

impl Paginator {
    /// Create a paginator with the default page size and pacing
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self::with_config(source, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_DELAY)
    }

    /// Create a paginator with explicit page size and pacing
    ///
    /// A page size of zero is raised to one.
    pub fn with_config(source: Arc<dyn CatalogSource>, page_size: usize, page_delay: Duration) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            page_delay,
        }
    }

    /// Items requested per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch every page of the catalog
    ///
    /// `on_progress(items_so_far, epoch_total)` is called after each page
    /// that returns data, including the first.
    ///
    /// # Errors
    ///
    /// Only a failure of the first page is returned; later failures are
    /// collected in [`PaginatedRun::skipped`].
    pub async fn run<F>(
        &self,
        filters: &CatalogFilters,
        mut on_progress: F,
    ) -> Result<PaginatedRun, FetchError>
    where
        F: FnMut(usize, usize) + Send,
    {
        let first = self.source.fetch_page(0, self.page_size, filters).await?;
        metrics::record_page_fetched();

        let epoch_total = first.total_count;
        let mut run = PaginatedRun {
            items: first.items,
            epoch_total,
            pages_requested: 1,
            ..Default::default()
        };
        on_progress(run.items.len(), epoch_total);

        let remaining_pages = page_count(epoch_total, self.page_size).saturating_sub(1);

        tracing::debug!(
            epoch_total,
            page_size = self.page_size,
            remaining_pages,
            "Fetched first page"
        );

        for index in 1..=remaining_pages {
            let offset = index * self.page_size;
            let page_number = index + 1;

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            run.pages_requested += 1;

            match self.source.fetch_page(offset, self.page_size, filters).await {
                Ok(page) if page.items.is_empty() => {
                    metrics::record_page_fetched();
                    tracing::debug!(page = page_number, offset, "Empty page, stopping pagination");
                    run.stopped_early = true;
                    break;
                }
                Ok(page) => {
                    metrics::record_page_fetched();
                    run.items.extend(page.items);
                    on_progress(run.items.len(), epoch_total);

                    tracing::info!(
                        fetched = run.items.len(),
                        total = epoch_total,
                        page = page_number,
                        "Sync progress"
                    );
                }
                Err(e) => {
                    metrics::record_page_skipped();
                    tracing::warn!(
                        page = page_number,
                        offset,
                        error = %e,
                        "Failed to fetch page, skipping"
                    );
                    run.skipped.push(SkippedPage {
                        page: page_number,
                        offset,
                        error: e,
                    });
                }
            }
        }

        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Serves a fixed catalog, failing at the configured offsets
    struct FixedCatalog {
        total: usize,
        served: usize,
        failing_offsets: Vec<usize>,
        calls: Mutex<Vec<usize>>,
    }

    impl FixedCatalog {
        fn new(total: usize) -> Self {
            Self {
                total,
                served: total,
                failing_offsets: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogSource for FixedCatalog {
        async fn fetch_page(
            &self,
            offset: usize,
            limit: usize,
            _filters: &CatalogFilters,
        ) -> Result<Page, FetchError> {
            self.calls.lock().unwrap().push(offset);
            if self.failing_offsets.contains(&offset) {
                return Err(FetchError::Status(500));
            }
            let end = (offset + limit).min(self.served);
            let items = (offset..end)
                .map(|i| serde_json::from_value(json!({"BoatID": i})).unwrap())
                .collect();
            Ok(Page {
                items,
                total_count: self.total,
            })
        }

        async fn fetch_detail(&self, _id: &str) -> Result<Option<Boat>, FetchError> {
            Ok(None)
        }
    }

    fn paginator(source: Arc<FixedCatalog>, page_size: usize) -> Paginator {
        Paginator::with_config(source, page_size, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_single_page_catalog() {
        let source = Arc::new(FixedCatalog::new(20));
        let run = paginator(source.clone(), 50)
            .run(&CatalogFilters::default(), |_, _| {})
            .await
            .unwrap();

        assert_eq!(run.items.len(), 20);
        assert_eq!(run.pages_requested, 1);
        assert_eq!(source.calls(), vec![0]);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let source = Arc::new(FixedCatalog::new(0));
        let run = paginator(source.clone(), 50)
            .run(&CatalogFilters::default(), |_, _| {})
            .await
            .unwrap();

        assert!(run.items.is_empty());
        assert_eq!(run.epoch_total, 0);
        assert_eq!(source.calls(), vec![0]);
    }

    #[tokio::test]
    async fn test_progress_reported_per_page() {
        let source = Arc::new(FixedCatalog::new(120));
        let mut progress = Vec::new();
        let run = paginator(source, 50)
            .run(&CatalogFilters::default(), |fetched, total| {
                progress.push((fetched, total))
            })
            .await
            .unwrap();

        assert_eq!(run.items.len(), 120);
        assert_eq!(progress, vec![(50, 120), (100, 120), (120, 120)]);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_fatal() {
        let mut catalog = FixedCatalog::new(120);
        catalog.failing_offsets = vec![0];
        let source = Arc::new(catalog);

        let result = paginator(source.clone(), 50)
            .run(&CatalogFilters::default(), |_, _| {})
            .await;

        assert!(matches!(result, Err(FetchError::Status(500))));
        assert_eq!(source.calls(), vec![0]);
    }

    #[tokio::test]
    async fn test_later_failure_is_skipped() {
        let mut catalog = FixedCatalog::new(150);
        catalog.failing_offsets = vec![50];
        let source = Arc::new(catalog);

        let run = paginator(source.clone(), 50)
            .run(&CatalogFilters::default(), |_, _| {})
            .await
            .unwrap();

        assert_eq!(source.calls(), vec![0, 50, 100]);
        assert_eq!(run.items.len(), 100);
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].page, 2);
        assert_eq!(run.skipped[0].offset, 50);
        assert_eq!(run.pages_succeeded(), 2);
        assert!(!run.stopped_early);
    }

    #[tokio::test]
    async fn test_empty_page_stops_early() {
        // Catalog claims 200 items but only has 60
        let mut catalog = FixedCatalog::new(200);
        catalog.served = 60;
        let source = Arc::new(catalog);

        let run = paginator(source.clone(), 50)
            .run(&CatalogFilters::default(), |_, _| {})
            .await
            .unwrap();

        assert_eq!(source.calls(), vec![0, 50, 100]);
        assert_eq!(run.items.len(), 60);
        assert!(run.stopped_early);
        assert_eq!(run.epoch_total, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_between_pages() {
        let source = Arc::new(FixedCatalog::new(150));
        let pager = Paginator::with_config(source, 50, Duration::from_millis(100));

        let started = tokio::time::Instant::now();
        pager
            .run(&CatalogFilters::default(), |_, _| {})
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_zero_page_size_is_raised() {
        let pager = Paginator::with_config(Arc::new(FixedCatalog::new(1)), 0, Duration::ZERO);
        assert_eq!(pager.page_size(), 1);
    }
}
