//! Trust ledger logic.
//!
//! This module implements the balance-keeping core:
//! - Trust and transaction domain types
//! - Input validation
//! - The balance rule (no trust ever goes negative)
//! - The transaction recorder (ids and server timestamps)
//! - The [`LedgerStore`] seam and an in-memory implementation
//! - [`LedgerService`], which ties validation, directory lookups and the
//!   store's atomic commit together

pub mod balance;
pub mod error;
pub mod memory;
pub mod recorder;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{apply_change, derive_balance, reconcile, running_balances_consistent};
pub use error::{ErrorCategory, LedgerError};
pub use memory::MemoryLedgerStore;
pub use recorder::TransactionRecorder;
pub use service::LedgerService;
pub use store::LedgerStore;
pub use types::{
    InflowInput, NewTrust, OutflowInput, PendingTransaction, Reconciliation, StudentAssignment,
    TransactionKind, Trust, TrustTransaction,
};
