//! Configuration management for boatsync
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::catalog::pager::{DEFAULT_PAGE_DELAY, DEFAULT_PAGE_SIZE};
use crate::models::CatalogFilters;
use crate::server::ServerConfig;

/// Default listing endpoint of the remote catalog
pub const DEFAULT_BASE_URL: &str = "https://batoo.api.digibusiness.it/Navis2WS/v2/boats";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote catalog configuration
    pub catalog: CatalogConfig,

    /// Sync run configuration
    pub sync: SyncConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Remote catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Listing endpoint; detail requests go to `<base_url>/<id>`
    pub base_url: String,

    /// Bearer credential
    pub api_token: Option<String>,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Sync run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Items requested per page
    pub page_size: usize,

    /// Pause before each page after the first, in milliseconds
    pub page_delay_ms: u64,

    /// Re-sync periodically while serving (disabled when unset)
    pub refresh_interval_secs: Option<u64>,

    /// Filters applied to every background sync
    pub filters: CatalogFilters,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            request_timeout_secs: 15,
            user_agent: format!("boatsync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CatalogConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_delay_ms: DEFAULT_PAGE_DELAY.as_millis() as u64,
            refresh_interval_secs: None,
            filters: CatalogFilters::default(),
        }
    }
}

impl SyncConfig {
    /// Get page pacing as Duration
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Get refresh interval as Duration
    #[must_use]
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs.map(Duration::from_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("BOATSYNC_BASE_URL").unwrap_or(defaults.catalog.base_url.clone());

        let api_token = std::env::var("BOATSYNC_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let request_timeout_secs = env_parse("BOATSYNC_REQUEST_TIMEOUT")
            .unwrap_or(defaults.catalog.request_timeout_secs);

        let user_agent =
            std::env::var("BOATSYNC_USER_AGENT").unwrap_or(defaults.catalog.user_agent.clone());

        let page_size = env_parse("BOATSYNC_PAGE_SIZE").unwrap_or(defaults.sync.page_size);

        let page_delay_ms =
            env_parse("BOATSYNC_PAGE_DELAY_MS").unwrap_or(defaults.sync.page_delay_ms);

        let refresh_interval_secs = env_parse("BOATSYNC_REFRESH_INTERVAL");

        let filters = CatalogFilters {
            price_from: env_parse("BOATSYNC_PRICE_FROM"),
            price_to: env_parse("BOATSYNC_PRICE_TO"),
            year_from: env_parse("BOATSYNC_YEAR_FROM"),
            year_to: env_parse("BOATSYNC_YEAR_TO"),
            length_from: env_parse("BOATSYNC_LENGTH_FROM"),
            length_to: env_parse("BOATSYNC_LENGTH_TO"),
        };

        let mut server = defaults.server.clone();
        if let Some(addr) = env_parse("BOATSYNC_BIND_ADDRESS") {
            server.bind_address = addr;
        }
        if let Ok(dir) = std::env::var("BOATSYNC_STATIC_DIR") {
            server.static_dir = Some(dir.into());
        }

        let log_level =
            std::env::var("BOATSYNC_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("BOATSYNC_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                api_token,
                request_timeout_secs,
                user_agent,
            },
            sync: SyncConfig {
                page_size,
                page_delay_ms,
                refresh_interval_secs,
                filters,
            },
            server,
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            anyhow::bail!("catalog.base_url must not be empty");
        }

        if self.catalog.request_timeout_secs == 0 {
            anyhow::bail!("catalog.request_timeout_secs must be greater than 0");
        }

        if self.sync.page_size == 0 {
            anyhow::bail!("sync.page_size must be greater than 0");
        }

        if self.sync.refresh_interval_secs == Some(0) {
            anyhow::bail!("sync.refresh_interval_secs must be greater than 0 when set");
        }

        self.sync
            .filters
            .validate()
            .map_err(|e| anyhow::anyhow!("sync.filters: {e}"))?;

        self.server
            .validate()
            .context("Invalid server configuration")?;

        Ok(())
    }
}
