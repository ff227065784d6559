//! Shared sync state
//!
//! [`SyncState`] is the only mutable object shared between the sync task and
//! request handlers. Every operation takes the same lock for its whole
//! duration and never performs I/O while holding it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::models::{Boat, SyncStatus};

#[derive(Debug, Default)]
struct Inner {
    cache: Arc<Vec<Boat>>,
    is_loading: bool,
    fetched_count: usize,
    estimated_total: usize,
    last_updated: Option<DateTime<Utc>>,
}

/// Cache snapshot, progress counters and busy flag behind one lock
///
/// Create it once at startup and share it through an `Arc`.
#[derive(Debug, Default)]
pub struct SyncState {
    inner: Mutex<Inner>,
}

impl SyncState {
    /// Create an empty, idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the state, recovering from a poisoned lock
    ///
    /// No operation leaves `Inner` half-written, so the data behind a
    /// poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record progress of the active run
    pub fn update_progress(&self, fetched: usize, total: usize) {
        let mut inner = self.lock();
        inner.fetched_count = fetched;
        inner.estimated_total = total;
        inner.last_updated = Some(Utc::now());
    }

    /// Set or clear the busy flag
    pub fn set_loading(&self, loading: bool) {
        self.lock().is_loading = loading;
    }

    /// Mark a run as started if none is active
    ///
    /// Returns `false` when a run is already active. On success the progress
    /// counters are reset to zero.
    pub fn try_begin_run(&self) -> bool {
        let mut inner = self.lock();
        if inner.is_loading {
            return false;
        }
        inner.is_loading = true;
        inner.fetched_count = 0;
        inner.estimated_total = 0;
        inner.last_updated = Some(Utc::now());
        true
    }

    /// Replace the cache with a new collection
    pub fn set_boats(&self, boats: Vec<Boat>) {
        let boats = Arc::new(boats);
        let mut inner = self.lock();
        inner.cache = boats;
        inner.last_updated = Some(Utc::now());
    }

    /// Whether a run is active
    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Current cache snapshot
    pub fn cache(&self) -> Arc<Vec<Boat>> {
        Arc::clone(&self.lock().cache)
    }

    /// Number of cached boats
    pub fn cache_size(&self) -> usize {
        self.lock().cache.len()
    }

    /// Whole status record, read under one lock
    pub fn status(&self) -> SyncStatus {
        let inner = self.lock();
        SyncStatus {
            fetched_count: inner.fetched_count,
            estimated_total: inner.estimated_total,
            is_loading: inner.is_loading,
            cache_size: inner.cache.len(),
            last_updated: inner.last_updated,
        }
    }
}
