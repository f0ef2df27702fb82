//! Amount - Positive two-decimal money wrapper
//!
//! Every monetary value that moves through an operation is an `Amount`:
//! strictly positive and rescaled to exactly two fractional digits at
//! construction, so stored balances never accumulate drift and comparisons
//! never happen on raw parsed values.

use crate::error::BankError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rescale a decimal to exactly two fractional digits.
///
/// Midpoints round to even, matching the fixed-point formatting the ledger
/// has always used.
pub fn normalize(value: Decimal) -> Decimal {
    let mut v = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    v.rescale(2);
    v
}

/// A strictly positive monetary amount, normalized to two decimals.
///
/// # Invariant
/// The inner value is always > 0 with scale 2. Enforced by the constructors.
///
/// # Example
/// ```
/// use unitybank_core::Amount;
///
/// let amount = Amount::parse("amount", "100.5").unwrap();
/// assert_eq!(amount.to_string(), "100.50");
///
/// assert!(Amount::parse("amount", "0").is_err());
/// assert!(Amount::parse("amount", "ten").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Parse an amount from user input.
    ///
    /// Returns `Validation { field }` unless the text parses as a number
    /// strictly greater than zero.
    pub fn parse(field: &'static str, text: &str) -> Result<Self, BankError> {
        let value = Decimal::from_str(text.trim()).map_err(|_| BankError::Validation { field })?;
        Self::new(field, value)
    }

    /// Create an amount from an already-parsed decimal.
    pub fn new(field: &'static str, value: Decimal) -> Result<Self, BankError> {
        if value <= Decimal::ZERO {
            return Err(BankError::Validation { field });
        }
        Ok(Self(normalize(value)))
    }

    /// Get the inner normalized decimal
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_normalizes_to_two_decimals() {
        let amount = Amount::parse("amount", "100.5").unwrap();
        assert_eq!(amount.value(), dec!(100.50));
        assert_eq!(amount.to_string(), "100.50");
    }

    #[test]
    fn parse_rounds_midpoints_to_even() {
        assert_eq!(Amount::parse("amount", "2.345").unwrap().value(), dec!(2.34));
        assert_eq!(Amount::parse("amount", "2.355").unwrap().value(), dec!(2.36));
    }

    #[test]
    fn zero_and_negative_rejected() {
        assert_eq!(
            Amount::parse("amount", "0"),
            Err(BankError::Validation { field: "amount" })
        );
        assert_eq!(
            Amount::parse("amount", "-4.20"),
            Err(BankError::Validation { field: "amount" })
        );
    }

    #[test]
    fn garbage_rejected_with_field_name() {
        assert_eq!(
            Amount::parse("initial deposit", "ten"),
            Err(BankError::Validation {
                field: "initial deposit"
            })
        );
    }

    #[test]
    fn normalize_pads_and_truncates() {
        assert_eq!(normalize(dec!(7)), dec!(7.00));
        assert_eq!(normalize(dec!(1.999)), dec!(2.00));
    }
}
