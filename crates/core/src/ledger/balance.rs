//! The balance rule.
//!
//! A trust balance only changes through a recorded transaction and never
//! drops below zero. Stores call [`apply_change`] while holding whatever
//! exclusivity they use for the trust, so the check and the write observe
//! the same balance.

use rust_decimal::Decimal;
use trustfund_shared::types::{TrustId, sum_money, within_money_limit};

use super::error::LedgerError;
use super::types::{PendingTransaction, Reconciliation, TransactionKind, TrustTransaction};

/// Computes the balance after applying `pending` to `balance`.
///
/// # Errors
///
/// - `InsufficientBalance` if an outflow exceeds `balance`. An outflow equal
///   to the balance is allowed and leaves zero.
/// - `BalanceLimitExceeded` if an inflow would take the balance past
///   [`MAX_AMOUNT`](trustfund_shared::types::MAX_AMOUNT).
pub fn apply_change(
    balance: Decimal,
    pending: &PendingTransaction,
) -> Result<Decimal, LedgerError> {
    if pending.kind == TransactionKind::Outflow && pending.amount > balance {
        return Err(LedgerError::InsufficientBalance {
            trust_id: pending.trust_id,
            available: balance,
            requested: pending.amount,
        });
    }
    balance
        .checked_add(pending.delta())
        .filter(|after| within_money_limit(*after))
        .ok_or(LedgerError::BalanceLimitExceeded {
            trust_id: pending.trust_id,
            balance,
            amount: pending.amount,
        })
}

/// Sums a transaction history into `(total_inflow, total_outflow)`.
#[must_use]
pub fn derive_balance<'a, I>(transactions: I) -> (Decimal, Decimal)
where
    I: IntoIterator<Item = &'a TrustTransaction>,
{
    transactions
        .into_iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(inflow, outflow), tx| {
            match tx.kind {
                TransactionKind::Inflow => (sum_money(inflow, tx.amount), outflow),
                TransactionKind::Outflow => (inflow, sum_money(outflow, tx.amount)),
            }
        })
}

/// Compares a trust's recorded balance with the history of its transactions.
///
/// Transactions belonging to other trusts are ignored.
#[must_use]
pub fn reconcile(
    trust_id: TrustId,
    recorded_balance: Decimal,
    transactions: &[TrustTransaction],
) -> Reconciliation {
    let own: Vec<&TrustTransaction> = transactions
        .iter()
        .filter(|tx| tx.trust_id == trust_id)
        .collect();
    let (total_inflow, total_outflow) = derive_balance(own.iter().copied());

    Reconciliation {
        trust_id,
        recorded_balance,
        derived_balance: total_inflow.saturating_sub(total_outflow),
        total_inflow,
        total_outflow,
        transaction_count: own.len(),
    }
}

/// Returns true if every `balance_after` equals the previous one plus the
/// transaction's delta, starting from zero.
///
/// `transactions` must be one trust's history in recording order.
#[must_use]
pub fn running_balances_consistent(transactions: &[TrustTransaction]) -> bool {
    let mut running = Decimal::ZERO;
    for tx in transactions {
        let Some(next) = running.checked_add(tx.delta()) else {
            return false;
        };
        running = next;
        if running != tx.balance_after || running < Decimal::ZERO {
            return false;
        }
    }
    true
}
