//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GP_API_BASE_URL` - Root URL of the commerce API (e.g., `http://localhost:3055/v1/api`)
//!
//! ## Optional
//! - `GP_STATE_DIR` - Directory for the persisted session store (default: `.green-papaya`)
//! - `GP_HTTP_TIMEOUT_SECS` - HTTP transport timeout in seconds (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default HTTP transport timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Commerce API root URL (always ends with a trailing slash)
    pub api_base_url: Url,
    /// Directory holding the persisted session database
    pub state_dir: PathBuf,
    /// HTTP transport timeout
    pub http_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = normalize_base_url(&get_required_env("GP_API_BASE_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("GP_API_BASE_URL".to_string(), e))?;
        let state_dir = PathBuf::from(get_env_or_default("GP_STATE_DIR", ".green-papaya"));
        let http_timeout_secs = get_env_or_default(
            "GP_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar("GP_HTTP_TIMEOUT_SECS".to_string(), e.to_string()))?;

        Ok(Self {
            api_base_url,
            state_dir,
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    /// Path of the embedded session database inside the state directory.
    #[must_use]
    pub fn state_db_path(&self) -> PathBuf {
        self.state_dir.join("storefront.redb")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a base URL, forcing a trailing slash so endpoint joins are relative
/// to the full path rather than the host root.
fn normalize_base_url(raw: &str) -> Result<Url, String> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err("URL cannot serve as a base".to_string());
    }

    Ok(url)
}
