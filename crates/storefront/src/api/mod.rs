//! Commerce API client.
//!
//! A thin typed wrapper over the remote REST API. Every request reads the
//! persisted session credentials and attaches them when present: the raw
//! access token in the `authorization` header (the upstream API takes the
//! token without a `Bearer ` prefix) and the customer ID in `x-client-id`.
//! Product responses are cached in-process via `moka` (5-minute TTL); auth
//! endpoints are never cached.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use green_papaya_core::ProductId;

use crate::config::StorefrontConfig;
use crate::models::{TokenPair, UserRecord};
use crate::storage::{KeyValueStore, keys};

use types::{
    AuthGrant, AuthMetadata, Envelope, LoginRequest, Product, ProductPayload, SignupRequest,
};

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message, or a generic fallback.
        message: String,
    },

    /// The response body was not valid JSON for the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response parsed but was semantically incomplete.
    #[error("malformed server response: {0}")]
    Malformed(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// An endpoint path did not form a valid URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Cached product responses, keyed by request.
#[derive(Clone)]
enum CacheValue {
    Single(Box<Product>),
    Many(Arc<Vec<Product>>),
}

/// Client for the commerce API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the response
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn KeyValueStore>,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// The storage handle is read per request for the current credentials;
    /// the session store is the only writer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(
        config: &StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                storage,
                cache,
            }),
        })
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` when the server rejects the credentials,
    /// carrying the server-provided message.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let metadata: AuthMetadata = self
            .execute(self.post("login")?.json(&LoginRequest { email, password }))
            .await?;

        metadata.into_grant().map_err(ApiError::Malformed)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` when the server rejects the registration,
    /// carrying the server-provided message.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        let metadata: AuthMetadata = self
            .execute(self.post("signup")?.json(&SignupRequest {
                name,
                email,
                password,
            }))
            .await?;

        metadata.into_grant().map_err(ApiError::Malformed)
    }

    /// Notify the server that the session is ending.
    ///
    /// The response body is ignored; only the status matters. Callers treat
    /// this as best-effort.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` on an error status or `ApiError::Http` on a
    /// transport failure.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(self.post("logout")?).await.map(|_| ())
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get all published products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_published_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products:published";

        if let Some(CacheValue::Many(products)) = self.inner.cache.get(cache_key).await {
            debug!("cache hit for published products");
            return Ok(products.as_ref().clone());
        }

        let payload: ProductPayload = self.execute(self.get("products/published")?).await?;
        let products = payload.into_vec();

        self.inner
            .cache
            .insert(
                cache_key.to_string(),
                CacheValue::Many(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Single(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let payload: ProductPayload = self
            .execute(self.get(&format!("products/{id}"))?)
            .await?;

        let product = payload
            .into_vec()
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Single(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Search products by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn search_products(&self, category: &str) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("products:search:{category}");

        if let Some(CacheValue::Many(products)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for category search");
            return Ok(products.as_ref().clone());
        }

        let payload: ProductPayload = self
            .execute(self.get(&format!("products/search/{category}"))?)
            .await?;
        let products = payload.into_vec();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Many(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    fn get(&self, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;
        Ok(self.inner.client.get(url))
    }

    fn post(&self, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.inner.base_url.join(path)?;
        Ok(self.inner.client.post(url))
    }

    /// Read the persisted credentials, if any.
    ///
    /// Absent or unreadable records mean anonymous requests; the token is
    /// trusted until the first API call that rejects it.
    fn stored_credentials(&self) -> (Option<String>, Option<String>) {
        let token = self
            .inner
            .storage
            .get(keys::SESSION_TOKENS)
            .ok()
            .flatten()
            .and_then(|bytes| serde_json::from_slice::<TokenPair>(&bytes).ok())
            .map(|tokens| tokens.access_token);

        let client_id = self
            .inner
            .storage
            .get(keys::USER_RECORD)
            .ok()
            .flatten()
            .and_then(|bytes| serde_json::from_slice::<UserRecord>(&bytes).ok())
            .map(|user| user.id.into_inner());

        (token, client_id)
    }

    /// Send a request with credentials attached and return the body text on
    /// success.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let (token, client_id) = self.stored_credentials();

        let mut request = request;
        if let Some(token) = token {
            request = request.header("authorization", token);
        }
        if let Some(client_id) = client_id {
            request = request.header("x-client-id", client_id);
        }

        let response = request.send().await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics.
        let text = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            warn!(status = %status, message = %message, "commerce API returned error");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    /// Send a request and unwrap the response envelope's metadata.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.send(request).await?;

        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        envelope
            .metadata
            .ok_or_else(|| ApiError::Malformed("response envelope has no metadata".to_string()))
    }
}

/// Pull the server message out of an error body, if it is an envelope.
fn extract_error_message(body: &str) -> Option<String> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body).ok()?;
    envelope.message.filter(|m| !m.is_empty())
}
