//! Green Papaya Storefront - Client-side storefront core.
//!
//! The stateful heart of a storefront UI, with the view layer stripped away:
//! a [`services::session::SessionStore`] for the authentication lifecycle, a
//! [`services::cart::CartStore`] for line-item aggregation, and an
//! [`api::ApiClient`] wrapping the remote commerce API.
//!
//! # Architecture
//!
//! - The remote API is the source of truth for products and credentials;
//!   there is no local sync, only direct calls (with short-lived response
//!   caching via `moka`).
//! - Session state is write-through persisted to an embedded key-value store
//!   ([`storage`]), the durable analog of browser local storage.
//! - Cart state is transient and in-memory, scoped to the process.
//! - Both stores notify registered change listeners synchronously after each
//!   atomic update, standing in for framework reactivity.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use green_papaya_storefront::api::ApiClient;
//! use green_papaya_storefront::config::StorefrontConfig;
//! use green_papaya_storefront::services::session::SessionStore;
//! use green_papaya_storefront::storage::RedbStore;
//!
//! let config = StorefrontConfig::from_env()?;
//! let storage = Arc::new(RedbStore::open(&config.state_db_path())?);
//! let api = ApiClient::new(&config, Arc::clone(&storage) as _)?;
//!
//! let session = SessionStore::new(api.clone(), storage);
//! session.hydrate();
//! let session = session.login("shop@example.com", "password").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod models;
pub mod notify;
pub mod services;
pub mod storage;
