//! Prometheus metrics for the sync service
//!
//! This module provides metrics tracking for:
//! - Sync runs: started, completed, failed, duration
//! - Pages: fetched and skipped
//! - Cache: current size and whether a run is active
//! - API: requests by endpoint and status
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_histogram, Counter,
    CounterVec, Encoder, Gauge, Histogram, TextEncoder,
};
use std::sync::OnceLock;
use std::time::Duration;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all sync metrics
struct SyncMetrics {
    runs_started: Counter,
    runs_completed: Counter,
    runs_failed: Counter,
    run_duration: Histogram,
    pages_fetched: Counter,
    pages_skipped: Counter,
    cache_size: Gauge,
    is_loading: Gauge,
    api_requests: CounterVec,
}

/// Global storage for sync metrics, or the reason registration failed
static SYNC_METRICS: OnceLock<Result<SyncMetrics, String>> = OnceLock::new();

/// Registered metrics, if initialization succeeded
fn metrics() -> Option<&'static SyncMetrics> {
    SYNC_METRICS.get().and_then(|m| m.as_ref().ok())
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// This function should be called once at application startup.
/// If metric registration fails, subsequent metric operations become no-ops.
///
/// # Example
///
/// ```ignore
/// if let Err(e) = boatsync::metrics::init_metrics() {
///     eprintln!("Warning: Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    // Concurrent callers block until the first registration finishes
    match SYNC_METRICS.get_or_init(|| register_metrics().map_err(|e| e.to_string())) {
        Ok(_) => Ok(()),
        Err(e) => Err(e.clone().into()),
    }
}

fn register_metrics() -> Result<SyncMetrics, prometheus::Error> {
    let metrics = SyncMetrics {
        runs_started: register_counter!(
            "boatsync_sync_runs_started_total",
            "Total sync runs started"
        )?,
        runs_completed: register_counter!(
            "boatsync_sync_runs_completed_total",
            "Total sync runs that replaced the cache"
        )?,
        runs_failed: register_counter!(
            "boatsync_sync_runs_failed_total",
            "Total sync runs aborted by a first-page failure"
        )?,
        run_duration: register_histogram!(
            "boatsync_sync_run_duration_seconds",
            "Duration of completed sync runs in seconds",
            vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]
        )?,
        pages_fetched: register_counter!(
            "boatsync_pages_fetched_total",
            "Total catalog pages fetched successfully"
        )?,
        pages_skipped: register_counter!(
            "boatsync_pages_skipped_total",
            "Total catalog pages skipped after a failure"
        )?,
        cache_size: register_gauge!("boatsync_cache_size", "Number of boats in the cache")?,
        is_loading: register_gauge!(
            "boatsync_sync_in_progress",
            "Whether a sync run is active (1 = yes, 0 = no)"
        )?,
        api_requests: register_counter_vec!(
            "boatsync_api_requests_total",
            "Total API requests by endpoint and status",
            &["endpoint", "status"]
        )?,
    };

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(metrics)
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    metrics().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record the start of a sync run
pub fn record_sync_started() {
    if let Some(m) = metrics() {
        m.runs_started.inc();
    }
}

/// Record a completed sync run
pub fn record_sync_completed(cached: usize, duration: Duration) {
    let Some(m) = metrics() else {
        return;
    };

    m.runs_completed.inc();
    m.run_duration.observe(duration.as_secs_f64());
    m.cache_size.set(cached as f64);
}

/// Record a sync run aborted on its first page
pub fn record_sync_failed() {
    if let Some(m) = metrics() {
        m.runs_failed.inc();
    }
}

/// Record a page fetched successfully
pub fn record_page_fetched() {
    if let Some(m) = metrics() {
        m.pages_fetched.inc();
    }
}

/// Record a page skipped after a failure
pub fn record_page_skipped() {
    if let Some(m) = metrics() {
        m.pages_skipped.inc();
    }
}

/// Update the loading and cache size gauges
pub fn update_sync_state(is_loading: bool, cache_size: usize) {
    let Some(m) = metrics() else {
        return;
    };

    m.is_loading.set(if is_loading { 1.0 } else { 0.0 });
    m.cache_size.set(cache_size as f64);
}

/// Record API request
pub fn record_api_request(endpoint: &str, status: u16) {
    if let Some(m) = metrics() {
        let status_str = status.to_string();
        m.api_requests
            .with_label_values(&[endpoint, &status_str])
            .inc();
    }
}

// ============================================================================
// Tests
// ============================================================================
