//! HTTP client for the remote boat catalog
//!
//! This module provides the reqwest-backed [`CatalogSource`] with:
//! - Bearer credential and JSON accept headers on every request
//! - A bounded per-request timeout
//! - Typed errors for transport, status, timeout and decoding failures

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, Response, StatusCode,
};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::CatalogConfig;
use crate::models::{Boat, CatalogFilters, Page};
use crate::utils::bearer_header;
use crate::utils::error::FetchError;

use super::CatalogSource;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Catalog client
///
/// One instance is shared by the sync task and the detail endpoint.
pub struct CatalogClient {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Listing endpoint; detail URLs are derived from it
    base_url: Url,

    /// Pre-built `Authorization` header value, if a token is configured
    auth_header: Option<HeaderValue>,
}

impl CatalogClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for an unusable base URL,
    /// `FetchError::InvalidHeader` for an unusable token and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        Self::with_config(
            &config.base_url,
            config.api_token.as_deref(),
            config.request_timeout(),
            &config.user_agent,
        )
    }

    /// Create a client with no credential and the default timeout
    ///
    /// Mostly useful against mock servers.
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Self::with_config(
            base_url,
            None,
            DEFAULT_TIMEOUT,
            concat!("boatsync/", env!("CARGO_PKG_VERSION")),
        )
    }

    /// Create a client with explicit settings
    ///
    /// # Arguments
    ///
    /// * `base_url` - Listing endpoint
    /// * `api_token` - Bearer credential (with or without the `Bearer ` prefix)
    /// * `timeout` - Per-request timeout
    /// * `user_agent` - User-Agent header value
    pub fn with_config(
        base_url: &str,
        api_token: Option<&str>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }

        let auth_header = api_token
            .filter(|t| !t.trim().is_empty())
            .map(|t| {
                let mut value = HeaderValue::from_str(&bearer_header(t))
                    .map_err(|_| FetchError::InvalidHeader("API token".to_string()))?;
                value.set_sensitive(true);
                Ok::<_, FetchError>(value)
            })
            .transpose()?;

        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Http)?;

        Ok(Self {
            client,
            base_url,
            auth_header,
        })
    }

    /// Listing endpoint this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the headers sent with every request
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(auth) = &self.auth_header {
            headers.insert(AUTHORIZATION, auth.clone());
        }

        headers
    }

    /// URL of a single listing: `<base>/<id>`
    fn detail_url(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Read the whole body and parse it as JSON
    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, FetchError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
        filters: &CatalogFilters,
    ) -> Result<Page, FetchError> {
        tracing::debug!(offset, limit, "Fetching catalog page");

        let response = self
            .client
            .get(self.base_url.clone())
            .headers(self.build_headers())
            .query(&[("start", offset), ("limit", limit)])
            .query(filters)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Self::read_json(response).await
    }

    async fn fetch_detail(&self, id: &str) -> Result<Option<Boat>, FetchError> {
        let url = self.detail_url(id)?;
        tracing::debug!(url = %url, "Fetching boat detail");

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        match Self::read_json::<Value>(response).await? {
            Value::Null => Ok(None),
            Value::Object(fields) if fields.is_empty() => Ok(None),
            Value::Object(fields) => Ok(Some(Boat::new(fields))),
            other => Err(FetchError::Decode(format!(
                "expected an object for boat {id}, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CatalogClient::with_base_url("http://localhost:8080/boats");
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            CatalogClient::with_base_url("not a url"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            CatalogClient::with_base_url("mailto:someone@example.com"),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_headers_include_credential() {
        let client = CatalogClient::with_config(
            "http://localhost/boats",
            Some("secret"),
            DEFAULT_TIMEOUT,
            "test",
        )
        .unwrap();

        let headers = client.build_headers();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
    }

    #[test]
    fn test_blank_token_sends_no_credential() {
        let client =
            CatalogClient::with_config("http://localhost/boats", Some("  "), DEFAULT_TIMEOUT, "test")
                .unwrap();
        assert!(!client.build_headers().contains_key(AUTHORIZATION));
    }

    #[test]
    fn test_detail_url() {
        let client = CatalogClient::with_base_url("http://localhost/v2/boats").unwrap();
        assert_eq!(
            client.detail_url("123").unwrap().as_str(),
            "http://localhost/v2/boats/123"
        );

        let client = CatalogClient::with_base_url("http://localhost/v2/boats/").unwrap();
        assert_eq!(
            client.detail_url("a b/c").unwrap().as_str(),
            "http://localhost/v2/boats/a%20b%2Fc"
        );
    }
}
