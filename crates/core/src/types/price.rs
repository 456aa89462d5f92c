//! Type-safe price representation using minor currency units.
//!
//! The upstream commerce API carries prices as bare integers in the smallest
//! currency unit (e.g., cents for USD). Keeping the integer representation
//! end-to-end means display values round-trip exactly; decimal conversion
//! happens only at the formatting boundary via `rust_decimal`.

use core::fmt;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A price in minor currency units.
///
/// ```
/// use green_papaya_core::{CurrencyCode, Price};
///
/// let price = Price::from_minor(1999, CurrencyCode::USD);
/// assert_eq!(price.to_string(), "$19.99");
/// assert_eq!(price.times(3).minor(), 5997);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Price {
    /// Amount in the smallest currency unit.
    minor: i64,
    /// ISO 4217 currency code.
    currency: CurrencyCode,
}

impl Price {
    /// Create a price from an amount in minor units.
    #[must_use]
    pub const fn from_minor(minor: i64, currency: CurrencyCode) -> Self {
        Self { minor, currency }
    }

    /// The zero price in the given currency.
    #[must_use]
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self::from_minor(0, currency)
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn minor(&self) -> i64 {
        self.minor
    }

    /// Currency code.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Amount as an exact decimal in the currency's standard unit.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::new(self.minor, self.currency.exponent())
    }

    /// Price multiplied by a quantity, saturating on overflow.
    #[must_use]
    pub const fn times(&self, quantity: u32) -> Self {
        Self {
            minor: self.minor.saturating_mul(quantity as i64),
            currency: self.currency,
        }
    }
}

impl Add for Price {
    type Output = Self;

    /// Sum two prices, keeping the left-hand currency.
    ///
    /// All prices from a single storefront share one currency; mixed-currency
    /// sums are a caller bug, caught in debug builds.
    fn add(self, rhs: Self) -> Self {
        debug_assert_eq!(self.currency, rhs.currency, "mixed-currency price sum");
        Self {
            minor: self.minor.saturating_add(rhs.minor),
            currency: self.currency,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.currency.symbol(), self.amount())
    }
}

// The wire format is a bare minor-unit integer; the upstream API carries no
// currency, so deserialized prices take the default currency.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.minor)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let minor = i64::deserialize(deserializer)?;
        Ok(Self::from_minor(minor, CurrencyCode::default()))
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Number of minor-unit digits after the decimal point.
    #[must_use]
    pub const fn exponent(&self) -> u32 {
        match self {
            Self::USD | Self::EUR | Self::GBP | Self::CAD | Self::AUD => 2,
        }
    }
}
