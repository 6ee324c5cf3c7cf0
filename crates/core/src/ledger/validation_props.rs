//! Property-based tests for ledger input validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::validation::{parse_amount, validate_amount};

/// Strategy to generate a valid positive amount (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any positive amount with at most two decimals is accepted unchanged.
    #[test]
    fn prop_positive_cents_accepted(amount in positive_amount()) {
        prop_assert_eq!(validate_amount(amount).unwrap(), amount);
    }

    /// Zero and negative amounts are always rejected.
    #[test]
    fn prop_non_positive_rejected(cents in 0i64..100_000_000i64) {
        let amount = Decimal::new(-cents, 2);
        prop_assert!(
            matches!(validate_amount(amount), Err(LedgerError::InvalidAmount(_))),
            "amount {} should be rejected",
            amount
        );
    }

    /// Sub-cent precision is rejected.
    #[test]
    fn prop_sub_cent_rejected(cents in 1i64..100_000_000i64, extra in 1i64..10i64) {
        let amount = Decimal::new(cents * 10 + extra, 3);
        prop_assert!(validate_amount(amount).is_err());
    }

    /// Formatting an amount and parsing it back yields the same value.
    #[test]
    fn prop_parse_display(amount in positive_amount()) {
        prop_assert_eq!(parse_amount(&amount.to_string()).unwrap(), amount);
    }

    /// Text without digits never parses.
    #[test]
    fn prop_alpha_rejected(text in "[a-zA-Z]{1,12}") {
        prop_assert!(parse_amount(&text).is_err());
    }
}
