//! REST API handlers
//!
//! List, status and stats endpoints read the in-memory snapshot and never
//! fail because of a sync. Only the detail endpoint calls the remote catalog.

use axum::{
    extract::{MatchedPath, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics;

use super::http::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Simple error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Reply to a manual sync trigger
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncStartedResponse {
    pub message: String,
    /// False when a run was already active
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
}

/// Query string of the list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub refresh: bool,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/boats", get(list_boats))
        .route("/api/boats/{boat_id}", get(get_boat))
        .route("/api/status", get(get_status))
        .route("/api/sync", post(trigger_sync))
        .route("/api/stats", get(get_stats))
        .route("/api/{*rest}", get(api_not_found))
        .route("/metrics", get(get_metrics))
        .route_layer(middleware::from_fn(track_requests))
        .with_state(state)
}

/// Count every routed request by its route template and status
async fn track_requests(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;
    metrics::record_api_request(&endpoint, response.status().as_u16());
    response
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Cached boats; `refresh=true` starts a sync but still answers from the
/// current snapshot
async fn list_boats(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    if params.refresh {
        if state.query.refresh().is_none() {
            tracing::debug!("Refresh requested while a sync is running");
        }
    } else {
        state.query.ensure_fresh_or_trigger();
    }

    let boats = state.query.list_cached();
    Json(boats.as_slice()).into_response()
}

/// Sync progress and cache size
async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.query.status())
}

/// Start a sync in the background
async fn trigger_sync(State(state): State<AppState>) -> impl IntoResponse {
    let handle = state.query.refresh();

    Json(SyncStartedResponse {
        message: "Sync started".to_string(),
        started: handle.is_some(),
        run_id: handle.as_ref().map(|h| h.run_id()),
    })
}

/// Price and year aggregates over the cache
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.query.stats())
}

/// One boat, fetched live from the catalog
async fn get_boat(State(state): State<AppState>, Path(boat_id): Path<String>) -> Response {
    match state.query.fetch_detail(&boat_id).await {
        Ok(boat) => Json(boat).into_response(),
        Err(e) if e.is_not_found() => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Boat not found"))).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

/// Prometheus exposition
async fn get_metrics() -> Response {
    match metrics::encode_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}

/// Unknown API paths never fall through to the frontend
async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
