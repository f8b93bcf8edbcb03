//! Server shared state
//!
//! Holds configuration and the backend client for the HTTP server.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    /// Station-metadata backend client
    client: ApiClient,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            client,
        })
    }

    /// Backend client
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Snapshot of the current configuration
    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
