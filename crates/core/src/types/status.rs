//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Stock availability of a product.
///
/// Derived from the quantity-in-stock reported by the commerce API; the cart
/// performs no stock enforcement, so this is a display concern only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
}

impl StockStatus {
    /// Classify a quantity-in-stock value.
    #[must_use]
    pub const fn from_quantity(quantity: u32) -> Self {
        if quantity > 0 {
            Self::InStock
        } else {
            Self::OutOfStock
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InStock => write!(f, "in stock"),
            Self::OutOfStock => write!(f, "out of stock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_quantity() {
        assert_eq!(StockStatus::from_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(1), StockStatus::InStock);
        assert_eq!(StockStatus::from_quantity(250), StockStatus::InStock);
    }

    #[test]
    fn test_display() {
        assert_eq!(StockStatus::InStock.to_string(), "in stock");
        assert_eq!(StockStatus::OutOfStock.to_string(), "out of stock");
    }
}
