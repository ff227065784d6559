//! Unified error handling for the boatsync crate
//!
//! Domain errors live next to the code that raises them; [`Error`] wraps
//! them for callers that cross module boundaries, such as the binary and
//! [`App`](crate::app::App) wiring.
//!
//! # Usage
//!
//! ```rust,ignore
//! use boatsync::error::{Error, ErrorCategory};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = ?err.category(), "Retrying: {err}");
//!     } else {
//!         tracing::error!("Fatal error: {err}");
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::server::{ConfigError, ServerError};
pub use crate::utils::error::{FetchError, FetchErrorKind, QueryError, SyncError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, bad status)
    Network,
    /// Payload decoding errors
    Parsing,
    /// Sync run failures
    Sync,
    /// Configuration and validation errors
    Config,
    /// HTTP server errors
    Server,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short lowercase label, used as a log field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Sync => "sync",
            Self::Config => "config",
            Self::Server => "server",
            Self::Other => "other",
        }
    }
}

/// Unified error type for the boatsync crate
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog request errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Sync run errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// Detail lookup errors
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Server configuration errors
    #[error("Server config error: {0}")]
    ServerConfig(#[from] ConfigError),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Sync(SyncError::FirstPage(e)) => e.is_recoverable(),
            Self::Sync(SyncError::Aborted(_)) => false,
            Self::Query(QueryError::Fetch(e)) => e.is_recoverable(),
            Self::Query(QueryError::DetailNotFound(_)) => false,
            Self::Io(_) => true, // I/O errors are often transient
            Self::ServerConfig(_)
            | Self::Server(_)
            | Self::Json(_)
            | Self::Config(_)
            | Self::Other { .. } => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e)
            | Self::Sync(SyncError::FirstPage(e))
            | Self::Query(QueryError::Fetch(e)) => match e.kind() {
                FetchErrorKind::Decode => ErrorCategory::Parsing,
                FetchErrorKind::Http | FetchErrorKind::Timeout => ErrorCategory::Network,
            },
            Self::Sync(SyncError::Aborted(_)) => ErrorCategory::Sync,
            Self::Query(QueryError::DetailNotFound(_)) => ErrorCategory::Other,
            Self::Json(_) => ErrorCategory::Parsing,
            Self::ServerConfig(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Server(_) | Self::Io(_) => ErrorCategory::Server,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Conversion from anyhow::Error
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: format!("{err:#}"),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
