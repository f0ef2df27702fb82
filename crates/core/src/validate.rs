//! Pure field validators
//!
//! Side-effect-free checks applied before any operation touches the store.
//! Every failure is `BankError::Validation` carrying the offending field
//! name, never a generic error.

use crate::error::BankError;
use chrono::NaiveDate;

/// Validate a `YYYY-MM-DD` calendar date (used for date of birth).
pub fn validate_date(field: &'static str, text: &str) -> Result<NaiveDate, BankError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| BankError::Validation { field })
}

/// Validate a mobile number: exactly 10 decimal digits.
pub fn validate_mobile(field: &'static str, text: &str) -> Result<(), BankError> {
    let text = text.trim();
    if text.len() == 10 && text.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(BankError::Validation { field })
    }
}

/// Validate a PIN: at least 4 characters, all decimal digits.
pub fn validate_pin(field: &'static str, text: &str) -> Result<(), BankError> {
    if text.len() >= 4 && text.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(BankError::Validation { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_accepts_calendar_dates_only() {
        assert!(validate_date("dob", "1990-07-14").is_ok());
        assert!(validate_date("dob", "1990-02-30").is_err());
        assert!(validate_date("dob", "14-07-1990").is_err());
        assert!(validate_date("dob", "").is_err());
    }

    #[test]
    fn mobile_requires_exactly_ten_digits() {
        assert!(validate_mobile("mobile", "9876543210").is_ok());
        assert!(validate_mobile("mobile", " 9876543210 ").is_ok());
        assert!(validate_mobile("mobile", "987654321").is_err());
        assert!(validate_mobile("mobile", "98765432100").is_err());
        assert!(validate_mobile("mobile", "98765x3210").is_err());
    }

    #[test]
    fn pin_requires_four_plus_digits() {
        assert!(validate_pin("pin", "1234").is_ok());
        assert!(validate_pin("pin", "004219").is_ok());
        assert_eq!(
            validate_pin("new pin", "12"),
            Err(BankError::Validation { field: "new pin" })
        );
        assert!(validate_pin("pin", "12a4").is_err());
    }
}
