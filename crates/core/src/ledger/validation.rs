//! Input validation for ledger operations.
//!
//! All checks here are pure and run before any store access.

use std::str::FromStr;

use rust_decimal::Decimal;
use trustfund_shared::types::{MAX_AMOUNT, MONEY_SCALE, fits_money_scale, within_money_limit};

use super::error::LedgerError;

/// Parses a monetary amount from its decimal string form.
///
/// # Errors
///
/// Returns `InvalidAmount` if the text is not a decimal number.
pub fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount("amount is empty".to_string()));
    }
    Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::InvalidAmount(format!("'{trimmed}' is not a number")))
}

/// Validates a transaction amount.
///
/// The amount must be strictly positive, at most [`MAX_AMOUNT`], and carry at
/// most two decimal places.
///
/// # Errors
///
/// Returns `InvalidAmount` describing the first rule violated.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "{amount} must be greater than zero"
        )));
    }
    if !within_money_limit(amount) {
        return Err(LedgerError::InvalidAmount(format!(
            "{amount} exceeds the maximum of {MAX_AMOUNT}"
        )));
    }
    if !fits_money_scale(amount) {
        return Err(LedgerError::InvalidAmount(format!(
            "{amount} has more than {MONEY_SCALE} decimal places"
        )));
    }
    Ok(amount)
}

/// Unwraps a required reference field.
///
/// # Errors
///
/// Returns `MissingRequiredField` naming `field` when `value` is `None`.
pub fn require_field<T>(value: Option<T>, field: &'static str) -> Result<T, LedgerError> {
    value.ok_or(LedgerError::MissingRequiredField(field))
}

/// Unwraps a required text field, rejecting blank values.
///
/// # Errors
///
/// Returns `MissingRequiredField` when the text is absent or whitespace only.
pub fn require_text(value: Option<&str>, field: &'static str) -> Result<String, LedgerError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(LedgerError::MissingRequiredField(field)),
    }
}

/// Validates and trims a trust name.
///
/// # Errors
///
/// Returns `InvalidTrustName` if the name is blank.
pub fn validate_trust_name(name: &str) -> Result<String, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidTrustName);
    }
    Ok(trimmed.to_string())
}

/// Trims free-form notes, dropping blank ones.
#[must_use]
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
