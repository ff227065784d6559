//! Read-side accessors used by the HTTP layer
//!
//! Everything here reads from [`SyncState`](crate::sync::SyncState) except
//! detail lookups, which always go to the remote catalog, and the explicit
//! trigger helpers.

use std::sync::Arc;

use crate::catalog::CatalogSource;
use crate::models::{Boat, CatalogFilters, SyncStatus};
use crate::stats::{calculate_stats, CatalogStats};
use crate::sync::{SyncCoordinator, SyncHandle};
use crate::utils::error::QueryError;

/// Query facade over the sync state and the remote catalog
#[derive(Clone)]
pub struct QueryService {
    coordinator: SyncCoordinator,
    source: Arc<dyn CatalogSource>,
    default_filters: CatalogFilters,
}

impl QueryService {
    /// Create a query service
    ///
    /// `default_filters` are used for every sync this service triggers.
    pub fn new(
        coordinator: SyncCoordinator,
        source: Arc<dyn CatalogSource>,
        default_filters: CatalogFilters,
    ) -> Self {
        Self {
            coordinator,
            source,
            default_filters,
        }
    }

    /// Coordinator behind this service
    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }

    /// Current cache snapshot; never triggers a sync
    pub fn list_cached(&self) -> Arc<Vec<Boat>> {
        self.coordinator.state().cache()
    }

    /// Current status record
    pub fn status(&self) -> SyncStatus {
        self.coordinator.state().status()
    }

    /// Aggregates over the current snapshot
    pub fn stats(&self) -> CatalogStats {
        calculate_stats(&self.list_cached())
    }

    /// Start a sync if the cache is empty and none is running
    pub fn ensure_fresh_or_trigger(&self) -> Option<SyncHandle> {
        let state = self.coordinator.state();
        if state.cache_size() > 0 || state.is_loading() {
            return None;
        }
        tracing::info!("Cache is empty, triggering sync");
        self.refresh()
    }

    /// Start a sync with the default filters
    pub fn refresh(&self) -> Option<SyncHandle> {
        self.trigger_sync(self.default_filters.clone())
    }

    /// Start a sync with explicit filters
    pub fn trigger_sync(&self, filters: CatalogFilters) -> Option<SyncHandle> {
        self.coordinator.trigger_sync(filters)
    }

    /// Fetch one boat straight from the remote catalog
    ///
    /// # Errors
    ///
    /// `QueryError::DetailNotFound` when the catalog has no such boat and
    /// `QueryError::Fetch` when the request fails.
    pub async fn fetch_detail(&self, id: &str) -> Result<Boat, QueryError> {
        match self.source.fetch_detail(id).await {
            Ok(Some(boat)) => Ok(boat),
            Ok(None) => Err(QueryError::DetailNotFound(id.to_string())),
            Err(e) => {
                tracing::error!(boat_id = %id, error = %e, "Error fetching boat details");
                Err(QueryError::Fetch(e))
            }
        }
    }
}
