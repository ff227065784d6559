//! Error types for the boatsync service
//!
//! This module defines the error types produced by the catalog client,
//! the sync pipeline and the query layer.

use thiserror::Error;

/// Coarse classification of a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// Transport failure or non-success HTTP status
    Http,
    /// The request did not complete within the configured timeout
    Timeout,
    /// The response body could not be decoded
    Decode,
}

/// Errors that can occur during a single catalog request
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Non-success status code returned by the catalog
    #[error("Catalog returned status {0}")]
    Status(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Malformed response body
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A configured value cannot be sent as a header
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl FetchError {
    /// Classify the error
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Http(_) | Self::Status(_) | Self::InvalidUrl(_) | Self::InvalidHeader(_) => {
                FetchErrorKind::Http
            }
            Self::Timeout => FetchErrorKind::Timeout,
            Self::Decode(_) => FetchErrorKind::Decode,
        }
    }

    /// Whether the same request could succeed if issued again
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Status(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::Decode(_) | Self::InvalidUrl(_) | Self::InvalidHeader(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Http(err)
        }
    }
}

/// Errors that abort a whole sync run
#[derive(Error, Debug)]
pub enum SyncError {
    /// The first page could not be fetched, so there is no total to page through
    #[error("Sync failed on first page: {0}")]
    FirstPage(#[source] FetchError),

    /// The background task ended without producing a result
    #[error("Sync task aborted: {0}")]
    Aborted(String),
}

/// Errors surfaced by the query layer
#[derive(Error, Debug)]
pub enum QueryError {
    /// The catalog has no record for the identifier
    #[error("Boat not found: {0}")]
    DetailNotFound(String),

    /// The detail request itself failed
    #[error("Detail fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

impl QueryError {
    /// Whether the boundary should report this as "not found"
    ///
    /// A failed detail fetch is indistinguishable from a missing record for
    /// HTTP clients, so both variants qualify.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DetailNotFound(_) | Self::Fetch(_))
    }
}
