//! Single-flight sync runs
//!
//! [`SyncCoordinator::trigger_sync`] starts at most one background run at a
//! time. A run pages through the catalog, deduplicates the result and swaps
//! it into [`SyncState`]. The busy flag is cleared by a drop guard so it is
//! reset whether the run succeeds, fails or panics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::catalog::{dedupe_with_stats, CatalogSource, DedupStats, PaginatedRun, Paginator, SkippedPage};
use crate::config::SyncConfig;
use crate::metrics;
use crate::models::CatalogFilters;
use crate::utils::error::SyncError;
use crate::utils::format_duration;

use super::state::SyncState;

// ============================================================================
// Run Report
// ============================================================================

/// Outcome of a successful sync run
#[derive(Debug)]
pub struct SyncReport {
    /// Identifier used in this run's log span
    pub run_id: Uuid,

    /// Total reported by the first page
    pub epoch_total: usize,

    /// Page requests issued, including failed ones
    pub pages_requested: usize,

    /// Items fetched before deduplication
    pub fetched: usize,

    /// Deduplication counters; `dedup.unique` is the new cache size
    pub dedup: DedupStats,

    /// Pages left out after failing
    pub skipped: Vec<SkippedPage>,

    /// Whether an empty page ended paging early
    pub stopped_early: bool,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl SyncReport {
    /// Number of boats now in the cache
    pub fn cached(&self) -> usize {
        self.dedup.unique
    }
}

// ============================================================================
// Run Handle
// ============================================================================

/// Handle to a background sync run
///
/// Dropping the handle detaches the run; it keeps going regardless.
#[derive(Debug)]
pub struct SyncHandle {
    run_id: Uuid,
    task: JoinHandle<Result<SyncReport, SyncError>>,
}

impl SyncHandle {
    /// Identifier of the run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Whether the run has finished
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to finish
    ///
    /// By the time this returns the busy flag has been cleared.
    pub async fn wait(self) -> Result<SyncReport, SyncError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(SyncError::Aborted(e.to_string())),
        }
    }
}

/// Clears the busy flag when dropped
struct LoadingGuard {
    state: Arc<SyncState>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.set_loading(false);
        metrics::update_sync_state(false, self.state.cache_size());
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// Starts sync runs and wires their output into [`SyncState`]
#[derive(Clone)]
pub struct SyncCoordinator {
    state: Arc<SyncState>,
    paginator: Arc<Paginator>,
}

impl SyncCoordinator {
    /// Create a coordinator around an existing paginator
    pub fn new(state: Arc<SyncState>, paginator: Paginator) -> Self {
        Self {
            state,
            paginator: Arc::new(paginator),
        }
    }

    /// Create a coordinator using the page size and pacing from configuration
    pub fn from_config(
        state: Arc<SyncState>,
        source: Arc<dyn CatalogSource>,
        config: &SyncConfig,
    ) -> Self {
        let paginator = Paginator::with_config(source, config.page_size, config.page_delay());
        Self::new(state, paginator)
    }

    /// Shared state this coordinator writes to
    pub fn state(&self) -> &Arc<SyncState> {
        &self.state
    }

    /// Whether a run is active
    pub fn is_running(&self) -> bool {
        self.state.is_loading()
    }

    /// Start a sync run in the background unless one is already active
    ///
    /// Returns immediately. `None` means a run was already active and this
    /// trigger was dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger_sync(&self, filters: CatalogFilters) -> Option<SyncHandle> {
        if !self.state.try_begin_run() {
            tracing::debug!("Sync already in progress, ignoring trigger");
            return None;
        }

        let guard = LoadingGuard {
            state: Arc::clone(&self.state),
        };
        metrics::record_sync_started();
        metrics::update_sync_state(true, self.state.cache_size());

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_run", %run_id);
        let state = Arc::clone(&self.state);
        let paginator = Arc::clone(&self.paginator);

        let task = tokio::spawn(
            async move {
                let _guard = guard;
                execute_run(run_id, &state, &paginator, &filters).await
            }
            .instrument(span),
        );

        Some(SyncHandle { run_id, task })
    }
}

/// One full sync run: paginate, deduplicate, replace the cache
async fn execute_run(
    run_id: Uuid,
    state: &Arc<SyncState>,
    paginator: &Paginator,
    filters: &CatalogFilters,
) -> Result<SyncReport, SyncError> {
    let started = Instant::now();
    tracing::info!(page_size = paginator.page_size(), "Starting background sync");

    let progress_state = Arc::clone(state);
    let run = paginator
        .run(filters, move |fetched, total| {
            progress_state.update_progress(fetched, total)
        })
        .await;

    let PaginatedRun {
        items,
        epoch_total,
        pages_requested,
        skipped,
        stopped_early,
    } = match run {
        Ok(run) => run,
        Err(e) => {
            metrics::record_sync_failed();
            tracing::error!(error = %e, "Sync failed, keeping previous cache");
            return Err(SyncError::FirstPage(e));
        }
    };

    let fetched = items.len();
    let (unique, dedup) = dedupe_with_stats(items);
    state.set_boats(unique);

    let duration = started.elapsed();
    metrics::record_sync_completed(dedup.unique, duration);

    tracing::info!(
        total = dedup.unique,
        fetched,
        epoch_total,
        pages = pages_requested,
        skipped_pages = skipped.len(),
        missing_id = dedup.missing_id,
        stopped_early,
        elapsed = %format_duration(duration),
        "Sync complete"
    );

    Ok(SyncReport {
        run_id,
        epoch_total,
        pages_requested,
        fetched,
        dedup,
        skipped,
        stopped_early,
        duration,
    })
}

// ============================================================================
// Tests
// ============================================================================
