//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the currency's standard unit (dollars, not cents) and
//! are never negative. Conversion to minor units happens only at the payment
//! boundary via [`Price::to_cents`].

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The input was not a decimal number.
    #[error("'{0}' is not a valid price")]
    Invalid(String),

    /// The amount was below zero.
    #[error("price cannot be negative")]
    Negative,

    /// The amount cannot be charged in whole cents.
    #[error("price is too large")]
    TooLarge,
}

/// A non-negative amount of money in the shop currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts and amounts whose cent
    /// value does not fit in an `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero and
    /// [`PriceError::TooLarge`] if it cannot be expressed in cents.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative);
        }
        let price = Self(amount);
        if price.to_cents().is_none() {
            return Err(PriceError::TooLarge);
        }
        Ok(price)
    }

    /// Create a price from a whole number of dollars.
    #[must_use]
    pub fn from_dollars(dollars: u32) -> Self {
        Self(Decimal::from(dollars))
    }

    /// Parse a user-entered amount such as `"48"` or `" 19.99 "`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] for non-numeric input and
    /// [`PriceError::Negative`] for amounts below zero.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let amount =
            Decimal::from_str(trimmed).map_err(|_| PriceError::Invalid(trimmed.to_string()))?;
        Self::new(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units. Saturates at the largest decimal.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Sum of two prices. Saturates at the largest decimal.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self(self.0.checked_add(other.0).unwrap_or(Decimal::MAX))
    }

    /// Amount in cents, rounded half away from zero.
    ///
    /// Returns `None` if the amount does not fit in an `i64`.
    #[must_use]
    pub fn to_cents(&self) -> Option<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Formats as `$48.00`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::plus)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_decimal_input() {
        assert_eq!(Price::parse("48").unwrap(), Price::from_dollars(48));
        assert_eq!(
            Price::parse(" 19.99 ").unwrap().amount(),
            Decimal::new(1999, 2)
        );
    }

    #[test]
    fn test_parse_rejects_garbage_and_negatives() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse(""), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse("NaN"), Err(PriceError::Invalid(_))));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_dollars(124).to_string(), "$124.00");
        assert_eq!(Price::parse("9.5").unwrap().to_string(), "$9.50");
    }

    #[test]
    fn test_to_cents() {
        assert_eq!(Price::from_dollars(48).to_cents(), Some(4800));
        assert_eq!(Price::parse("19.995").unwrap().to_cents(), Some(2000));
    }

    #[test]
    fn test_sum_and_times() {
        let total: Price = [Price::from_dollars(48).times(2), Price::from_dollars(28)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_dollars(124));
    }

    #[test]
    fn test_parse_rejects_amounts_beyond_cents() {
        assert_eq!(
            Price::parse("100000000000000000000"),
            Err(PriceError::TooLarge)
        );
        assert!(Price::parse("100000000000000000").is_err());
        assert!(Price::parse("90000000000000").is_ok());
    }

    #[test]
    fn test_large_totals_saturate() {
        let price = Price::parse("90000000000000").unwrap();
        let line = price.times(u32::MAX);
        assert!(line > price);
        assert_eq!(line.to_cents(), None);

        let total: Price = [Price(Decimal::MAX), line].into_iter().sum();
        assert_eq!(total, Price(Decimal::MAX));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("\"-5\"").is_err());
        assert_eq!(
            serde_json::from_str::<Price>("\"40\"").unwrap(),
            Price::from_dollars(40)
        );
    }
}
