//! In-memory ledger store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use trustfund_shared::types::TrustId;

use super::balance::apply_change;
use super::error::LedgerError;
use super::recorder::TransactionRecorder;
use super::store::LedgerStore;
use super::types::{NewTrust, PendingTransaction, Trust, TrustTransaction};
use crate::clock::{Clock, SystemClock};
use crate::reports::{ReportService, TransactionFilter};

#[derive(Debug, Default)]
struct State {
    trusts: HashMap<TrustId, Trust>,
    transactions: Vec<TrustTransaction>,
}

impl State {
    fn trust(&self, id: TrustId) -> Result<&Trust, LedgerError> {
        self.trusts.get(&id).ok_or(LedgerError::TrustNotFound(id))
    }

    fn adjust_balance(&mut self, tx: &TrustTransaction) -> Result<Trust, LedgerError> {
        let trust = self
            .trusts
            .get_mut(&tx.trust_id)
            .ok_or(LedgerError::TrustNotFound(tx.trust_id))?;
        trust.balance = tx.balance_after;
        trust.updated_at = tx.created_at;
        Ok(trust.clone())
    }

    fn append_transaction(&mut self, tx: TrustTransaction) {
        self.transactions.push(tx);
    }
}

/// Ledger store held entirely in memory.
///
/// A single write lock covers each commit, so check, adjust and append are
/// never interleaved with another commit.
#[derive(Debug)]
pub struct MemoryLedgerStore {
    state: RwLock<State>,
    recorder: TransactionRecorder,
}

impl MemoryLedgerStore {
    /// Creates an empty store on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            recorder: TransactionRecorder::new(clock),
        }
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn create_trust(&self, trust: NewTrust) -> Result<Trust, LedgerError> {
        let now = self.recorder.now();
        let created = Trust {
            id: TrustId::new(),
            name: trust.name,
            balance: Decimal::ZERO,
            details: trust.details,
            created_at: now,
            updated_at: now,
        };
        self.state
            .write()
            .await
            .trusts
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_trust(&self, id: TrustId) -> Result<Option<Trust>, LedgerError> {
        Ok(self.state.read().await.trusts.get(&id).cloned())
    }

    async fn list_trusts(&self) -> Result<Vec<Trust>, LedgerError> {
        let mut trusts: Vec<Trust> = self.state.read().await.trusts.values().cloned().collect();
        trusts.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(trusts)
    }

    async fn commit(
        &self,
        pending: PendingTransaction,
    ) -> Result<(Trust, TrustTransaction), LedgerError> {
        let mut state = self.state.write().await;

        let balance_after = apply_change(state.trust(pending.trust_id)?.balance, &pending)?;
        let tx = self.recorder.record(pending, balance_after);
        let trust = state.adjust_balance(&tx)?;
        state.append_transaction(tx.clone());

        Ok((trust, tx))
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TrustTransaction>, LedgerError> {
        let state = self.state.read().await;
        Ok(ReportService::filter_transactions(&state.transactions, filter))
    }
}
