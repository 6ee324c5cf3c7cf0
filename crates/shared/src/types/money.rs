//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Trust balances are single-currency amounts held as `rust_decimal::Decimal`
//! and persisted as `NUMERIC(14,2)`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places a monetary amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount or balance a `NUMERIC(14,2)` column holds: 999,999,999,999.99.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, MONEY_SCALE);

/// Rounds an amount to [`MONEY_SCALE`] places using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount fits in [`MONEY_SCALE`] decimal places
/// without rounding (trailing zeros are ignored).
#[must_use]
pub fn fits_money_scale(amount: Decimal) -> bool {
    amount.normalize().scale() <= MONEY_SCALE
}

/// Returns true if the amount is within [`MAX_AMOUNT`] in magnitude.
#[must_use]
pub fn within_money_limit(amount: Decimal) -> bool {
    amount.abs() <= MAX_AMOUNT
}

/// Sums two amounts, saturating at the bounds of `Decimal` instead of
/// panicking.
#[must_use]
pub fn sum_money(a: Decimal, b: Decimal) -> Decimal {
    a.saturating_add(b)
}

/// Formats an amount with exactly [`MONEY_SCALE`] decimal places.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = round_money(amount);
    rounded.rescale(MONEY_SCALE);
    rounded.to_string()
}
