//! Type-safe price representation using decimal arithmetic.
//!
//! The inventory API sends prices as plain JSON numbers (`139.9`), so `Price`
//! serializes through `rust_decimal::serde::float` while all arithmetic stays
//! in `Decimal`. Display formatting is left to the rendering layer.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit or line price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at the largest representable
    /// amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or_else(|| saturate(self.0)),
        )
    }
}

/// Largest amount with the sign of `toward`.
fn saturate(toward: Decimal) -> Decimal {
    if toward.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates instead of overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        Self(
            self.0
                .checked_add(rhs.0)
                .unwrap_or_else(|| saturate(self.0)),
        )
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_deserializes_from_json_number() {
        let price: Price = serde_json::from_str("139.9").unwrap();
        assert_eq!(price, Price::from_cents(13990));
    }

    #[test]
    fn test_price_serializes_as_json_number() {
        let json = serde_json::to_string(&Price::from_cents(17990)).unwrap();
        assert_eq!(json, "179.9");
    }

    #[test]
    fn test_price_times_and_sum() {
        let unit = Price::from_cents(1050);
        assert_eq!(unit.times(3), Price::from_cents(3150));

        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_price_arithmetic_saturates() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge.times(u32::MAX), huge);
        assert_eq!(huge + Price::from_cents(1), huge);

        let total: Price = [huge, huge, Price::from_cents(100)].into_iter().sum();
        assert_eq!(total, huge);

        let negative = Price::new(Decimal::MIN);
        assert_eq!(negative.times(2), negative);
    }
}
