//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront trades in a single currency, so a price is a non-negative
//! [`Decimal`] amount in major units (dollars, not cents). Decimal arithmetic
//! keeps cart totals exact; floats never appear in money math.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative price in the storefront's currency.
///
/// ## Examples
///
/// ```
/// use coursecart_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(9900, 2)).unwrap();
/// assert_eq!(price.to_string(), "$99.00");
/// assert_eq!(price.line_total(2).to_string(), "$198.00");
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Create a price from a whole amount in major units.
    #[must_use]
    pub fn from_major(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The extended total for `quantity` units at this price.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        let err = Price::new(Decimal::new(-500, 2)).unwrap_err();
        assert!(matches!(err, PriceError::Negative(_)));
    }

    #[test]
    fn test_new_accepts_zero_and_positive() {
        assert!(Price::new(Decimal::ZERO).is_ok());
        assert!(Price::new(Decimal::new(4999, 2)).is_ok());
    }

    #[test]
    fn test_from_cents() {
        let price = Price::from_cents(1999);
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_line_total() {
        let price = Price::from_major(99);
        assert_eq!(price.line_total(2), Price::from_major(198));
        assert_eq!(price.line_total(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_major(10), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), Decimal::new(1250, 2));
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::from_major(99).to_string(), "$99.00");
        assert_eq!(Price::from_cents(1950).to_string(), "$19.50");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_major(100) > Price::from_cents(9999));
    }

    #[test]
    fn test_serde_uses_string_amounts() {
        // rust_decimal's serde-with-str feature keeps amounts exact in JSON
        let price = Price::from_cents(1999);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"19.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
