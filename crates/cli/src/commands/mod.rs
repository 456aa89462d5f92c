//! CLI command implementations.

pub mod auth;
pub mod cart;
pub mod products;

use std::sync::Arc;

use thiserror::Error;

use green_papaya_storefront::api::{ApiClient, ApiError};
use green_papaya_storefront::config::{ConfigError, StorefrontConfig};
use green_papaya_storefront::services::session::{AuthError, SessionStore};
use green_papaya_storefront::storage::{KeyValueStore, RedbStore, StorageError};

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The persisted session store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The commerce API call failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Authentication failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a command needs: config, API client, and a hydrated session.
pub(crate) struct App {
    pub api: ApiClient,
    pub session: SessionStore,
}

/// Bootstrap the storefront core from the environment.
///
/// Opens the persisted store, builds the API client on top of it, and
/// hydrates the session once, the same startup sequence a UI shell would run.
pub(crate) fn bootstrap() -> Result<App, CliError> {
    let config = StorefrontConfig::from_env()?;

    let storage: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&config.state_db_path())?);
    let api = ApiClient::new(&config, Arc::clone(&storage))?;

    let session = SessionStore::new(api.clone(), storage);
    session.hydrate();

    Ok(App { api, session })
}
