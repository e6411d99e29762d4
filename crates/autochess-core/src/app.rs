//! Application context.
//!
//! `App` is built once at startup and handed to whatever front end drives
//! it. It owns the configuration, the HTTP client and the single auth store;
//! nothing in the crate keeps global state.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::auth::{
    AuthStore, FileTokenStorage, KeyringTokenStorage, MemoryTokenStorage, StorageBackend,
    TokenStorage,
};
use crate::config::Config;

pub struct App {
    pub config: Config,
    pub api: ApiClient,
    pub auth: AuthStore,
    pub storage: Arc<dyn TokenStorage>,
}

impl App {
    /// Build the context using the storage backend named in the config
    pub fn bootstrap(config: Config) -> Result<Self> {
        let storage = Self::open_storage(&config)?;
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let api = ApiClient::new(&config.base_url, config.request_timeout())
            .context("Failed to build HTTP client")?;
        let auth = AuthStore::new(
            Arc::new(api.clone()),
            Arc::clone(&storage),
            config.response_contract,
        );

        info!(
            base_url = %api.base_url(),
            storage = ?config.storage,
            status = auth.status().display_name(),
            "Application bootstrapped"
        );

        Ok(Self {
            config,
            api,
            auth,
            storage,
        })
    }

    fn open_storage(config: &Config) -> Result<Arc<dyn TokenStorage>> {
        let storage: Arc<dyn TokenStorage> = match config.storage {
            StorageBackend::File => {
                let dir = config.data_dir()?;
                debug!(?dir, "Using file token storage");
                Arc::new(FileTokenStorage::new(dir))
            }
            StorageBackend::Keyring => Arc::new(KeyringTokenStorage::new()?),
            StorageBackend::Memory => Arc::new(MemoryTokenStorage::new()),
        };
        Ok(storage)
    }

    /// Client carrying the current bearer token, if logged in
    pub fn authorized_client(&self) -> Option<ApiClient> {
        self.auth
            .token()
            .filter(|token| !token.is_empty())
            .map(|token| self.api.with_token(token))
    }
}
