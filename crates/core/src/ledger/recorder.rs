//! Transaction recorder.
//!
//! Turns a [`PendingTransaction`] into an immutable [`TrustTransaction`] by
//! assigning its id and server-side timestamp.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use trustfund_shared::types::TrustTransactionId;

use super::types::{PendingTransaction, TrustTransaction};
use crate::clock::{Clock, SystemClock};

/// Assigns ids and strictly increasing timestamps to new transactions.
///
/// Two transactions recorded through the same recorder never share a
/// `created_at`, even if the clock stalls or steps backwards.
#[derive(Debug)]
pub struct TransactionRecorder {
    clock: Arc<dyn Clock>,
    last: Mutex<Option<DateTime<Utc>>>,
}

impl TransactionRecorder {
    /// Creates a recorder reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: Mutex::new(None),
        }
    }

    /// Returns the current time of the underlying clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Returns the next timestamp to stamp a transaction with.
    pub fn next_timestamp(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now();
        let stamped = match *last {
            Some(previous) if now <= previous => previous + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(stamped);
        stamped
    }

    /// Records `pending`, which left the trust at `balance_after`.
    #[must_use]
    pub fn record(&self, pending: PendingTransaction, balance_after: Decimal) -> TrustTransaction {
        Self::record_at(pending, balance_after, self.next_timestamp())
    }

    /// Records `pending` with a timestamp already taken from
    /// [`next_timestamp`](Self::next_timestamp).
    #[must_use]
    pub fn record_at(
        pending: PendingTransaction,
        balance_after: Decimal,
        created_at: DateTime<Utc>,
    ) -> TrustTransaction {
        TrustTransaction {
            id: TrustTransactionId::new(),
            trust_id: pending.trust_id,
            kind: pending.kind,
            amount: pending.amount,
            balance_after,
            notes: pending.notes,
            assignment: pending.assignment,
            created_at,
        }
    }
}

impl Default for TransactionRecorder {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
