//! HTTP boundary for the catalog cache
//!
//! # Routes
//!
//! ```text
//! GET  /api/boats[?refresh=true]   cached boats
//! GET  /api/boats/{boat_id}        live detail from the catalog
//! GET  /api/status                 sync progress
//! POST /api/sync                   start a sync
//! GET  /api/stats                  price and year aggregates
//! GET  /api/health                 liveness
//! GET  /metrics                    Prometheus exposition
//! GET  /*                          frontend, when a static dir is set
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use boatsync::server::{ServerConfig, SyncServer};
//!
//! let server = SyncServer::new(ServerConfig::default(), query)?;
//! server.start().await?;
//! ```

pub mod api;
pub mod config;
pub mod http;

// Re-export main types
pub use config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use http::{AppState, ServerError, ServerInfo, SyncServer};
