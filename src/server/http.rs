//! HTTP server
//!
//! Wires the API router, optional frontend serving and the background sync
//! triggers together.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::query::QueryService;

use super::api::create_router;
use super::config::{ConfigError, ServerConfig};

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Read-side facade over the sync state
    pub query: QueryService,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: ServerConfig,
}

// ============================================================================
// Sync Server
// ============================================================================

/// HTTP server in front of the catalog cache
pub struct SyncServer {
    config: ServerConfig,
    state: AppState,
    refresh_interval: Option<Duration>,
}

impl SyncServer {
    /// Create a new server
    pub fn new(config: ServerConfig, query: QueryService) -> Result<Self, ServerError> {
        config.validate()?;

        let state = AppState {
            query,
            start_time: Instant::now(),
            config: config.clone(),
        };

        Ok(Self {
            config,
            state,
            refresh_interval: None,
        })
    }

    /// Re-sync every `interval` while serving
    pub fn with_refresh_interval(mut self, interval: Option<Duration>) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if let Some(dir) = &self.config.static_dir {
            if dir.is_dir() {
                let index = dir.join("index.html");
                router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
                tracing::info!(dir = %dir.display(), "Serving frontend");
            } else {
                tracing::warn!(
                    dir = %dir.display(),
                    "Static directory not found, serving API only"
                );
            }
        }

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e))?;

        tracing::info!("Starting boatsync server on {}", addr);

        self.start_background_tasks();

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Initial sync plus the optional periodic refresh
    fn start_background_tasks(&self) {
        if self.state.query.refresh().is_none() {
            tracing::debug!("Initial sync skipped, a run is already active");
        }

        if let Some(period) = self.refresh_interval {
            let query = self.state.query.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                // The first tick completes immediately; the initial sync covers it
                interval.tick().await;
                loop {
                    interval.tick().await;
                    if query.refresh().is_none() {
                        tracing::debug!("Periodic refresh skipped, sync still running");
                    }
                }
            });
        }

        tracing::info!(
            refresh_interval_secs = self.refresh_interval.map(|d| d.as_secs()),
            "Background tasks started"
        );
    }

    /// Get server info
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            bind_address: self.config.bind_address,
            static_dir: self.config.static_dir.clone(),
            refresh_interval: self.refresh_interval,
            cors_enabled: self.config.enable_cors,
            request_logging_enabled: self.config.enable_request_logging,
        }
    }
}

/// Server information
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub bind_address: SocketAddr,
    pub static_dir: Option<PathBuf>,
    pub refresh_interval: Option<Duration>,
    pub cors_enabled: bool,
    pub request_logging_enabled: bool,
}

impl ServerInfo {
    /// Format as display string
    pub fn display(&self) -> String {
        format!(
            "boatsync server\n\
             {:-<40}\n\
             Bind Address: {}\n\
             Static Dir: {}\n\
             Refresh Interval: {}\n\
             CORS: {}\n\
             Request Logging: {}",
            "",
            self.bind_address,
            self.static_dir
                .as_ref()
                .map_or_else(|| "none".to_string(), |d| d.display().to_string()),
            self.refresh_interval
                .map_or_else(|| "disabled".to_string(), |d| format!("{}s", d.as_secs())),
            if self.cors_enabled { "enabled" } else { "disabled" },
            if self.request_logging_enabled { "enabled" } else { "disabled" }
        )
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
