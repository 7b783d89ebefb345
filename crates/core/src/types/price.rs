//! Meal price using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("'{0}' is not a valid price")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More than two fractional digits.
    #[error("price can have at most two decimal places")]
    TooPrecise,
}

/// A non-negative amount with at most two decimal places.
///
/// The admin API sends prices either as JSON numbers or numeric strings;
/// both deserialize. Prices serialize as strings to keep them exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Parse a price typed into a form field. A leading `$` is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the input is not a number, is negative, or
    /// has more than two decimal places.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let amount =
            Decimal::from_str(digits).map_err(|_| PriceError::Invalid(input.to_owned()))?;
        Self::try_from(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        Ok(Self(amount))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
