//! Wire types for the commerce API.
//!
//! Every response travels in a `{ message, code, metadata }` envelope; the
//! shapes here mirror the upstream JSON (snake-cased `product_*` fields,
//! camel-cased auth fields) and are normalized into domain types before any
//! store sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use green_papaya_core::{CustomerId, Email, Price, ProductId, StockStatus};

use crate::models::{TokenPair, UserRecord};

// =============================================================================
// Response Envelope
// =============================================================================

/// The common response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Human-readable status message.
    pub message: Option<String>,
    /// Application-level status code (mirrors the HTTP status).
    pub code: Option<i64>,
    /// The payload; absent on errors.
    pub metadata: Option<T>,
}

// =============================================================================
// Auth Types
// =============================================================================

/// Login request body.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Signup request body.
#[derive(Debug, Serialize)]
pub(crate) struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Auth endpoint payload: the created/authenticated shop plus its tokens.
#[derive(Debug, Deserialize)]
pub struct AuthMetadata {
    /// The user record (the upstream API calls storefront accounts "shops").
    pub shop: Option<WireUser>,
    /// The issued token pair.
    pub tokens: Option<WireTokens>,
}

/// User record as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    /// Mongo-style object ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address (validated during normalization).
    pub email: String,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Token pair as it appears on the wire.
#[derive(Debug, Deserialize)]
pub struct WireTokens {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// A successfully normalized authentication result.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    /// The authenticated user.
    pub user: UserRecord,
    /// The issued credentials.
    pub tokens: TokenPair,
}

impl AuthMetadata {
    /// Normalize the duck-typed auth payload into a domain grant.
    ///
    /// # Errors
    ///
    /// Returns a description of the missing or invalid field when the server
    /// response lacks the user record, the token pair, or a parseable email.
    pub(crate) fn into_grant(self) -> Result<AuthGrant, String> {
        let shop = self.shop.ok_or("auth response has no user record")?;
        let tokens = self.tokens.ok_or("auth response has no token pair")?;

        let email = Email::parse(&shop.email)
            .map_err(|e| format!("invalid email in user record: {e}"))?;

        Ok(AuthGrant {
            user: UserRecord {
                id: CustomerId::new(shop.id),
                name: shop.name,
                email,
                roles: shop.roles.into_iter().collect(),
            },
            tokens: TokenPair {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
        })
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// The shop that listed a product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopSummary {
    /// Shop display name.
    pub name: String,
    /// Shop contact email.
    pub email: String,
}

/// Free-form product attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductAttributes {
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Model designation.
    #[serde(default)]
    pub model: Option<String>,
    /// Base color.
    #[serde(default)]
    pub color: Option<String>,
}

/// A product in the store (read-only, fetched).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Product {
    /// Product ID.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name.
    #[serde(rename = "product_name")]
    pub name: String,
    /// Thumbnail image URL.
    #[serde(rename = "product_thumb")]
    pub thumbnail: String,
    /// Plain text description.
    #[serde(rename = "product_description", default)]
    pub description: String,
    /// Unit price in minor currency units.
    #[serde(rename = "product_price")]
    pub price: Price,
    /// Quantity in stock.
    #[serde(rename = "product_quantity", default)]
    pub quantity: u32,
    /// Product category (e.g., "Electronics").
    #[serde(rename = "product_type", default)]
    pub category: String,
    /// The listing shop.
    #[serde(rename = "product_shop", default)]
    pub shop: Option<ShopSummary>,
    /// Free-form attributes.
    #[serde(rename = "product_attributes", default)]
    pub attributes: ProductAttributes,
    /// Gallery image URLs.
    #[serde(rename = "product_images", default)]
    pub images: Vec<String>,
    /// Available color variants.
    #[serde(rename = "product_colors", default)]
    pub colors: Vec<String>,
    /// Available size variants.
    #[serde(rename = "product_sizes", default)]
    pub sizes: Vec<String>,
    /// Whether the listing is a draft.
    #[serde(rename = "isDraft", default)]
    pub is_draft: bool,
    /// Whether the listing is published.
    #[serde(rename = "isPublished", default)]
    pub is_published: bool,
    /// Creation timestamp.
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Stock availability derived from the quantity in stock.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_quantity(self.quantity)
    }
}

/// Product payload normalized out of its duck-typed wire shape.
///
/// The upstream API returns either a bare product object or an array
/// depending on the endpoint; the distinction is resolved here, at the
/// client boundary, so store logic never branches on response shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductPayload {
    /// An array of products.
    Many(Vec<Product>),
    /// A single product object.
    Single(Box<Product>),
}

impl ProductPayload {
    /// Flatten into a list, whatever the wire shape was.
    #[must_use]
    pub fn into_vec(self) -> Vec<Product> {
        match self {
            Self::Many(products) => products,
            Self::Single(product) => vec![*product],
        }
    }
}
