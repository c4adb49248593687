//! Non-negative prices using decimal arithmetic.
//!
//! A price of exactly zero is the "custom quote" marker: the package is
//! priced by negotiation, so it contributes nothing to a numeric total but
//! callers still need to know it is there.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),

    /// The amount is above [`Price::MAX_AMOUNT`].
    #[error("price cannot exceed {max} (got {0})", max = Price::MAX_AMOUNT)]
    TooLarge(Decimal),
}

/// A non-negative price in the site's currency (Indian rupees).
///
/// Serialized as a decimal string (`"4999.00"`); deserializes from either a
/// JSON string or number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// The custom-quote price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest accepted amount (one lakh crore). Keeps totals far from the
    /// `Decimal` range.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

    /// Currency symbol used when formatting.
    pub const CURRENCY_SYMBOL: &'static str = "₹";

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero and
    /// [`PriceError::TooLarge`] if it is above [`Price::MAX_AMOUNT`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_zero() {
            return Ok(Self::ZERO);
        }
        if amount.is_sign_negative() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from whole currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price marks a custom quote.
    #[must_use]
    pub const fn is_custom_quote(&self) -> bool {
        self.0.is_zero()
    }

    /// Price multiplied by a quantity, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", Self::CURRENCY_SYMBOL, self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Format a decimal amount the way prices are displayed.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{}{:.2}", Price::CURRENCY_SYMBOL, amount)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 0)),
            Err(PriceError::Negative(_))
        ));
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(Price::MAX_AMOUNT, Decimal::from(1_000_000_000_000_u64));
        assert!(Price::new(Price::MAX_AMOUNT).is_ok());
        assert!(matches!(
            Price::new(Price::MAX_AMOUNT + Decimal::ONE),
            Err(PriceError::TooLarge(_))
        ));

        let parsed: Result<Price, _> = serde_json::from_str("\"100000000000000000000\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_times_at_upper_bound() {
        let max = Price::new(Price::MAX_AMOUNT).unwrap();
        assert_eq!(
            max.times(u32::MAX),
            Price::MAX_AMOUNT * Decimal::from(u32::MAX)
        );
    }

    #[test]
    fn test_zero_is_custom_quote() {
        assert!(Price::ZERO.is_custom_quote());
        assert!(!Price::from_units(100).is_custom_quote());
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::from_units(100).times(3), Decimal::from(300));
        assert_eq!(Price::ZERO.times(7), Decimal::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::new(Decimal::new(49_995, 1)).unwrap().to_string(), "₹4999.50");
        assert_eq!(format_amount(Decimal::from(200)), "₹200.00");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Price = serde_json::from_str("100").unwrap();
        let from_string: Price = serde_json::from_str("\"100\"").unwrap();
        assert_eq!(from_number, Price::from_units(100));
        assert_eq!(from_string, Price::from_units(100));
    }

    #[test]
    fn test_deserialize_negative_rejected() {
        let parsed: Result<Price, _> = serde_json::from_str("-5");
        assert!(parsed.is_err());
    }
}
