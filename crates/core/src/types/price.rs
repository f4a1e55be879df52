//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel as JSON numbers (the backend and the persisted cart both use
//! plain numbers), but are held as [`Decimal`] so that totals never pick up
//! binary floating point error. They are written out as the exact decimal
//! text, never through `f64`.
//!
//! Arithmetic saturates at [`Decimal::MAX`] instead of panicking.
//!
//! Decoding is deliberately forgiving: a missing, non-numeric or negative
//! price becomes zero rather than an error, so one bad catalog entry cannot
//! take the whole catalog down.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Currency symbol used when displaying prices.
pub const CURRENCY_SYMBOL: &str = "₱";

/// Errors that can occur when parsing a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number, got {0:?}")]
    NotANumber(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount of money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, coercing negative amounts to zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        if amount.is_sign_negative() {
            Self::ZERO
        } else {
            Self(amount.normalize())
        }
    }

    /// Create a price from an integer number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    /// Strictly parse a price typed by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decimal number or is negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::NotANumber(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self::new(amount))
    }

    /// Leniently read a price from an arbitrary JSON value.
    ///
    /// Numbers and numeric strings are honoured; anything else is zero.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let text = match value {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.trim().to_owned(),
            _ => return Self::ZERO,
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_or(Self::ZERO, Self::new)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map_or(Self(Decimal::MAX), |amount| Self(amount.normalize()))
    }

    /// Format for display (e.g., "₱19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.0
            .checked_add(rhs.0)
            .map_or(Self(Decimal::MAX), |amount| Self(amount.normalize()))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = serde_json::Number::from_str(&self.0.to_string())
            .map_err(serde::ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negative_coerces_to_zero() {
        assert_eq!(Price::new(Decimal::new(-500, 2)), Price::ZERO);
    }

    #[test]
    fn test_from_json_number_and_string() {
        assert_eq!(Price::from_json(&json!(299.99)), Price::from_cents(29999));
        assert_eq!(Price::from_json(&json!("89.00")), Price::from_cents(8900));
        assert_eq!(Price::from_json(&json!(5)), Price::from_cents(500));
    }

    #[test]
    fn test_from_json_garbage_is_zero() {
        assert_eq!(Price::from_json(&json!(null)), Price::ZERO);
        assert_eq!(Price::from_json(&json!("abc")), Price::ZERO);
        assert_eq!(Price::from_json(&json!({"amount": 3})), Price::ZERO);
        assert_eq!(Price::from_json(&json!(-3)), Price::ZERO);
    }

    #[test]
    fn test_parse_strict() {
        assert_eq!(Price::parse(" 12.50 ").unwrap(), Price::from_cents(1250));
        assert!(matches!(
            Price::parse("twelve"),
            Err(PriceError::NotANumber(_))
        ));
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(1000).times(2), Price::from_cents(500)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2500));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(2500).display(), "₱25.00");
        assert_eq!(Price::from_cents(7999).to_string(), "79.99");
        assert_eq!(Price::ZERO.display(), "₱0.00");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Price::from_cents(1099)).unwrap();
        assert_eq!(json, json!(10.99));
        assert_eq!(serde_json::to_string(&Price::ZERO).unwrap(), "0");
    }

    #[test]
    fn test_serialize_keeps_every_digit() {
        let price = Price::parse("19.123456789012345678").unwrap();
        let text = serde_json::to_string(&price).unwrap();
        assert_eq!(text, "19.123456789012345678");
        assert_eq!(serde_json::from_str::<Price>(&text).unwrap(), price);

        let nested = serde_json::to_string(&json!({ "total": price })).unwrap();
        assert_eq!(nested, r#"{"total":19.123456789012345678}"#);
    }

    #[test]
    fn test_times_saturates_at_max() {
        let max = Price::from_json(&json!("79228162514264337593543950335"));
        assert_eq!(max, Price::new(Decimal::MAX));
        assert_eq!(max.times(2), Price::new(Decimal::MAX));
        assert_eq!(max.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum_saturates_at_max() {
        let half = Price::parse("50000000000000000000000000000").unwrap();
        assert_eq!(half + half, Price::new(Decimal::MAX));

        let total: Price = [half, half, Price::from_cents(100)].into_iter().sum();
        assert_eq!(total, Price::new(Decimal::MAX));
    }

    #[test]
    fn test_deserialize_via_serde() {
        let price: Price = serde_json::from_str("\"449.00\"").unwrap();
        assert_eq!(price, Price::from_cents(44900));
    }
}
