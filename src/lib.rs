//! boatsync - Boat catalog mirror
//!
//! Mirrors a remote, paginated boat-listing catalog into memory and serves
//! it over HTTP with live sync progress.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`catalog`] - Catalog client, pagination and deduplication
//! - [`sync`] - Shared sync state and the single-flight coordinator
//! - [`query`] - Read-side facade used by the HTTP layer
//! - [`server`] - axum router, frontend serving and background triggers
//! - [`stats`] - Price and build-year aggregates
//! - [`config`] - Configuration management and settings
//! - [`metrics`] - Prometheus metrics
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use boatsync::app::App;
//! use boatsync::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_config(Config::from_env()?)?;
//!     if let Some(handle) = app.query().refresh() {
//!         let report = handle.wait().await?;
//!         println!("{} boats cached", report.cached());
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod query;
pub mod server;
pub mod stats;
pub mod sync;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::App;
    pub use crate::catalog::{CatalogClient, CatalogSource, Paginator};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{Boat, BoatId, CatalogFilters, Page, SyncStatus};
    pub use crate::query::QueryService;
    pub use crate::stats::CatalogStats;
    pub use crate::sync::{SyncCoordinator, SyncHandle, SyncReport, SyncState};
}

// Direct re-exports for convenience
pub use models::{Boat, BoatId, CatalogFilters, Page, SyncStatus};
