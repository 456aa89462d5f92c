//! Cart domain types.

use serde::{Deserialize, Serialize};

use green_papaya_core::{Price, ProductId};

use crate::api::types::Product;

/// The product-customization choices that distinguish otherwise-identical
/// cart lines.
///
/// Together with the product ID this forms a cart line's identity: adding the
/// same product in a different color or size creates a separate line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    /// Selected color, if the product has color variants.
    pub color: Option<String>,
    /// Selected size, if the product has size variants.
    pub size: Option<String>,
}

impl VariantKey {
    /// A variant key with no customization (single-variant products).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            color: None,
            size: None,
        }
    }

    /// A color-only variant key.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            size: None,
        }
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.color, &self.size) {
            (Some(color), Some(size)) => write!(f, "{color}/{size}"),
            (Some(color), None) => write!(f, "{color}"),
            (None, Some(size)) => write!(f, "{size}"),
            (None, None) => write!(f, "-"),
        }
    }
}

/// One aggregated entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// The customization choices identifying this line.
    pub variant: VariantKey,
    /// Name shown in the cart panel.
    pub display_name: String,
    /// Price per unit.
    pub unit_price: Price,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// Number of units; always at least 1.
    pub quantity: u32,
    /// Whether this line is included in the selected subtotal.
    pub selected: bool,
}

impl CartLine {
    /// Total price of this line (`unit_price` × `quantity`).
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Input for adding a line to the cart.
///
/// The cart normalizes rather than rejects: a zero quantity is floored to 1
/// when the line is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    /// The product being added.
    pub product_id: ProductId,
    /// The customization choices.
    pub variant: VariantKey,
    /// Name shown in the cart panel.
    pub display_name: String,
    /// Price per unit.
    pub unit_price: Price,
    /// Thumbnail image URL.
    pub thumbnail: String,
    /// Number of units to add.
    pub quantity: u32,
}

impl CartLineInput {
    /// Build a cart line input from a fetched product.
    ///
    /// The product is read-only input here; the cart owns the resulting line.
    #[must_use]
    pub fn from_product(product: &Product, variant: VariantKey, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            variant,
            display_name: product.name.clone(),
            unit_price: product.price,
            thumbnail: product.thumbnail.clone(),
            quantity,
        }
    }
}
