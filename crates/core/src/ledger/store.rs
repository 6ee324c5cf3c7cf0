//! Ledger storage seam.

use async_trait::async_trait;
use trustfund_shared::types::TrustId;

use super::error::LedgerError;
use super::types::{NewTrust, PendingTransaction, Trust, TrustTransaction};
use crate::reports::TransactionFilter;

/// Durable record of trusts and their transactions.
///
/// Balance changes go through [`LedgerStore::commit`] only. A store must run
/// the balance check, the balance update and the transaction append as one
/// indivisible unit per trust: either all of it is visible afterwards or
/// none of it is.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Creates a trust with a zero balance.
    ///
    /// `trust.name` is expected to be validated already.
    async fn create_trust(&self, trust: NewTrust) -> Result<Trust, LedgerError>;

    /// Fetches a trust by ID.
    async fn get_trust(&self, id: TrustId) -> Result<Option<Trust>, LedgerError>;

    /// Lists all trusts ordered by name.
    async fn list_trusts(&self) -> Result<Vec<Trust>, LedgerError>;

    /// Applies `pending` to its trust and records it.
    ///
    /// Returns the trust as it stands after the change and the recorded
    /// transaction.
    ///
    /// # Errors
    ///
    /// - `TrustNotFound` if the trust does not exist
    /// - `InsufficientBalance` if an outflow exceeds the balance at the
    ///   moment it is applied; nothing is written in that case
    /// - `Storage` on backend failure
    async fn commit(
        &self,
        pending: PendingTransaction,
    ) -> Result<(Trust, TrustTransaction), LedgerError>;

    /// Lists transactions matching `filter`, newest first.
    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TrustTransaction>, LedgerError>;
}
