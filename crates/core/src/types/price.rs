//! Money type for catalog prices, in Brazilian reais.
//!
//! All monetary values go through [`Price`] or raw `Decimal` arithmetic -
//! floats never touch money. `parse` accepts both the machine form used by
//! the API (`"10.50"`) and the display form used in the shop's product
//! sheets (`"R$ 10,50"`).

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a valid number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount of money in BRL.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a `Price` from a string.
    ///
    /// Accepts `"10.50"`, `"R$ 10,50"`, and `"1.234,56"` (thousands dots in
    /// the Brazilian form are tolerated).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim().trim_start_matches("R$").trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        // Brazilian display form uses ',' as the decimal separator and '.'
        // for thousands; the machine form is plain decimal.
        let normalized = if trimmed.contains(',') {
            trimmed.replace('.', "").replace(',', ".")
        } else {
            trimmed.to_owned()
        };

        let amount: Decimal = normalized
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;

        Self::from_decimal(amount)
    }

    /// Create a `Price` from a `Decimal`, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for amounts below zero.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units of this price.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }

    /// Render in the Brazilian display form, e.g. `R$ 10,50`.
    #[must_use]
    pub fn display(&self) -> String {
        format_brl(self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Format a decimal amount as BRL, e.g. `R$ 1234,50`.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    format!("R$ {amount:.2}").replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_machine_form() {
        assert_eq!(Price::parse("10.50").unwrap().amount(), dec("10.50"));
        assert_eq!(Price::parse("0").unwrap().amount(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_brazilian_form() {
        assert_eq!(Price::parse("R$ 10,50").unwrap().amount(), dec("10.50"));
        assert_eq!(Price::parse("R$10,00").unwrap().amount(), dec("10.00"));
        assert_eq!(Price::parse("1.234,56").unwrap().amount(), dec("1234.56"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Price::parse(""), Err(PriceError::Empty)));
        assert!(matches!(Price::parse("R$ "), Err(PriceError::Empty)));
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(matches!(Price::parse("-5.00"), Err(PriceError::Negative)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::parse("10.5").unwrap().display(), "R$ 10,50");
        assert_eq!(Price::parse("8").unwrap().display(), "R$ 8,00");
        assert_eq!(format_brl(dec("63.00")), "R$ 63,00");
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::parse("10.00").unwrap().times(3), dec("30.00"));
    }

    #[test]
    fn test_serde_uses_decimal_string() {
        let price = Price::parse("25.00").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
