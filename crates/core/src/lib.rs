//! Green Papaya Core - Shared types library.
//!
//! This crate provides common types used across all Green Papaya components:
//! - `storefront` - Client-side storefront core (session, cart, API client)
//! - `cli` - Command-line driver for the storefront core
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
