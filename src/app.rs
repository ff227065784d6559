//! Component wiring
//!
//! Builds the shared state, catalog client, coordinator and query facade
//! from a validated [`Config`]. The binary and integration tests both start
//! here.

use std::sync::Arc;

use crate::catalog::{CatalogClient, CatalogSource};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::query::QueryService;
use crate::server::SyncServer;
use crate::sync::{SyncCoordinator, SyncState};

/// Fully wired service components
#[derive(Clone)]
pub struct App {
    config: Config,
    state: Arc<SyncState>,
    query: QueryService,
}

impl App {
    /// Wire the service against the catalog named in `config`
    pub fn from_config(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::config(format!("{e:#}")))?;

        let source: Arc<dyn CatalogSource> = Arc::new(CatalogClient::new(&config.catalog)?);
        Ok(Self::with_source(config, source))
    }

    /// Wire the service against an arbitrary catalog source
    ///
    /// The configuration is used as given.
    pub fn with_source(config: Config, source: Arc<dyn CatalogSource>) -> Self {
        let state = Arc::new(SyncState::new());
        let coordinator =
            SyncCoordinator::from_config(Arc::clone(&state), Arc::clone(&source), &config.sync);
        let query = QueryService::new(coordinator, source, config.sync.filters.clone());

        Self {
            config,
            state,
            query,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared sync state
    pub fn state(&self) -> &Arc<SyncState> {
        &self.state
    }

    /// Query facade
    pub fn query(&self) -> &QueryService {
        &self.query
    }

    /// HTTP server over this app
    pub fn server(&self) -> Result<SyncServer> {
        let server = SyncServer::new(self.config.server.clone(), self.query.clone())?
            .with_refresh_interval(self.config.sync.refresh_interval());
        Ok(server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = Config::default();
        config.sync.page_size = 0;

        let err = App::from_config(config).err().unwrap();
        assert_eq!(err.category(), ErrorCategory::Config);
    }

    #[test]
    fn test_from_config_rejects_bad_url() {
        let mut config = Config::default();
        config.catalog.base_url = "not a url".to_string();

        let err = App::from_config(config).err().unwrap();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[tokio::test]
    async fn test_default_wiring() {
        let app = App::from_config(Config::default()).unwrap();

        assert!(app.query().list_cached().is_empty());
        assert!(!app.state().is_loading());
        assert_eq!(app.config().sync.page_size, 50);
        assert!(app.server().is_ok());
    }
}
