//! HTTP server configuration

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;

fn default_bind_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

/// Configuration for the HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// Enable permissive CORS
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,

    /// Directory holding the frontend build (optional)
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            enable_cors: true,
            enable_request_logging: true,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Validate the configuration
    ///
    /// A missing static directory is not an error; the server logs it and
    /// serves the API only.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.static_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "static_dir".to_string(),
                    reason: "Path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    bind_address: Option<SocketAddr>,
    enable_cors: Option<bool>,
    enable_request_logging: Option<bool>,
    static_dir: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Set bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = Some(addr);
        self
    }

    /// Set bind address from string
    pub fn bind_address_str(mut self, addr: &str) -> Result<Self, ConfigError> {
        self.bind_address = Some(addr.parse().map_err(|_| ConfigError::InvalidValue {
            field: "bind_address".to_string(),
            reason: format!("Invalid address: {addr}"),
        })?);
        Ok(self)
    }

    /// Enable/disable CORS
    pub fn enable_cors(mut self, enable: bool) -> Self {
        self.enable_cors = Some(enable);
        self
    }

    /// Enable/disable request logging
    pub fn enable_request_logging(mut self, enable: bool) -> Self {
        self.enable_request_logging = Some(enable);
        self
    }

    /// Serve a frontend from `dir`
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Build the config
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let config = ServerConfig {
            bind_address: self.bind_address.unwrap_or_else(default_bind_address),
            enable_cors: self.enable_cors.unwrap_or(true),
            enable_request_logging: self.enable_request_logging.unwrap_or(true),
            static_dir: self.static_dir,
        };

        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
