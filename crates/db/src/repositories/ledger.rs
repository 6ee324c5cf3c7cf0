//! Postgres ledger store.
//!
//! Every balance change runs inside one database transaction:
//! 1. A conditional `UPDATE trusts SET balance = balance + delta` that, for
//!    outflows, only matches while `balance >= amount`. The row lock it takes
//!    serialises concurrent commits on the same trust, and Postgres
//!    re-evaluates the predicate after the lock is granted.
//!    The same statement stamps the row with a time later than its previous
//!    stamp, and that stamp becomes the transaction's `created_at`.
//! 2. The insert of the recorded transaction.
//!
//! If the update matches no row, nothing has been written and the error is
//! resolved to `TrustNotFound`, `InsufficientBalance` or
//! `BalanceLimitExceeded`.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use trustfund_core::clock::{Clock, SystemClock};
use trustfund_core::ledger::{
    LedgerError, LedgerStore, NewTrust, PendingTransaction, StudentAssignment, TransactionKind,
    TransactionRecorder, Trust, TrustTransaction, apply_change,
};
use trustfund_core::reports::TransactionFilter;
use trustfund_shared::types::{
    AcademicYearId, CourseId, MAX_AMOUNT, StudentId, TrustId, TrustTransactionId,
};

use super::storage_error;
use crate::entities::sea_orm_active_enums::TrustTransactionType;
use crate::entities::{trust_transactions, trusts};

/// New `updated_at` for a trust row, also used as the transaction's
/// `created_at`. Evaluated while the row lock is held, so each trust's
/// stamps strictly increase in commit order whichever process commits.
const STAMP_UNDER_LOCK: &str = "GREATEST($1, \"updated_at\" + INTERVAL '1 microsecond')";

/// Ledger store backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    db: DatabaseConnection,
    recorder: Arc<TransactionRecorder>,
}

impl PgLedgerStore {
    /// Creates a new store on the system clock.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_clock(db, Arc::new(SystemClock))
    }

    /// Creates a new store reading time from `clock`.
    #[must_use]
    pub fn with_clock(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            recorder: Arc::new(TransactionRecorder::new(clock)),
        }
    }
}

#[async_trait::async_trait]
impl LedgerStore for PgLedgerStore {
    async fn create_trust(&self, trust: NewTrust) -> Result<Trust, LedgerError> {
        let now = self.recorder.now().fixed_offset();
        let model = trusts::ActiveModel {
            id: Set(TrustId::new().into_inner()),
            name: Set(trust.name),
            balance: Set(Decimal::ZERO),
            details: Set(trust.details),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(storage_error)?;

        Ok(trust_from_model(model))
    }

    async fn get_trust(&self, id: TrustId) -> Result<Option<Trust>, LedgerError> {
        let model = trusts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(trust_from_model))
    }

    async fn list_trusts(&self) -> Result<Vec<Trust>, LedgerError> {
        let models = trusts::Entity::find()
            .order_by_asc(trusts::Column::Name)
            .order_by_asc(trusts::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(models.into_iter().map(trust_from_model).collect())
    }

    async fn commit(
        &self,
        pending: PendingTransaction,
    ) -> Result<(Trust, TrustTransaction), LedgerError> {
        let txn = self.db.begin().await.map_err(storage_error)?;
        let candidate = self.recorder.next_timestamp().fixed_offset();

        let mut update = trusts::Entity::update_many()
            .col_expr(
                trusts::Column::Balance,
                Expr::col(trusts::Column::Balance).add(pending.delta()),
            )
            .col_expr(
                trusts::Column::UpdatedAt,
                Expr::cust_with_values(STAMP_UNDER_LOCK, [candidate]),
            )
            .filter(trusts::Column::Id.eq(pending.trust_id.into_inner()));
        update = match pending.kind {
            TransactionKind::Outflow => update.filter(trusts::Column::Balance.gte(pending.amount)),
            TransactionKind::Inflow => {
                let headroom = MAX_AMOUNT.saturating_sub(pending.amount);
                update.filter(trusts::Column::Balance.lte(headroom))
            }
        };
        let updated = update
            .exec_with_returning(&txn)
            .await
            .map_err(storage_error)?;

        let Some(trust) = updated.into_iter().next() else {
            let current = trusts::Entity::find_by_id(pending.trust_id.into_inner())
                .one(&txn)
                .await
                .map_err(storage_error)?;
            txn.rollback().await.map_err(storage_error)?;
            let Some(model) = current else {
                return Err(LedgerError::TrustNotFound(pending.trust_id));
            };
            tracing::warn!(
                trust_id = %pending.trust_id,
                balance = %model.balance,
                amount = %pending.amount,
                "Conditional balance update matched no row"
            );
            return Err(match apply_change(model.balance, &pending) {
                Err(err) => err,
                Ok(_) => LedgerError::Storage(format!(
                    "balance update on trust {} matched no row",
                    pending.trust_id
                )),
            });
        };

        // The stamp written under the row lock orders this trust's history.
        let created_at = trust.updated_at.with_timezone(&Utc);
        let tx = TransactionRecorder::record_at(pending, trust.balance, created_at);
        transaction_to_active_model(&tx)
            .insert(&txn)
            .await
            .map_err(storage_error)?;
        txn.commit().await.map_err(storage_error)?;

        Ok((trust_from_model(trust), tx))
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TrustTransaction>, LedgerError> {
        let mut query = trust_transactions::Entity::find();

        if let Some(trust_id) = filter.trust_id {
            query = query.filter(trust_transactions::Column::TrustId.eq(trust_id.into_inner()));
        }
        if let Some(course_id) = filter.course_id {
            query = query.filter(trust_transactions::Column::CourseId.eq(course_id.into_inner()));
        }
        if let Some(kind) = filter.kind {
            let kind = TrustTransactionType::from(kind);
            query = query.filter(trust_transactions::Column::TransactionType.eq(kind));
        }
        let (start, end) = filter.date_range.bounds();
        if let Some(start) = start {
            query = query.filter(trust_transactions::Column::CreatedAt.gte(start.fixed_offset()));
        }
        if let Some(end) = end {
            query = query.filter(trust_transactions::Column::CreatedAt.lt(end.fixed_offset()));
        }

        let models = query
            .order_by_desc(trust_transactions::Column::CreatedAt)
            .order_by_desc(trust_transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        models.into_iter().map(transaction_from_model).collect()
    }
}

/// Converts a trust row into the domain type.
fn trust_from_model(model: trusts::Model) -> Trust {
    Trust {
        id: TrustId::from_uuid(model.id),
        name: model.name,
        balance: model.balance,
        details: model.details,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

/// Converts a transaction row into the domain type.
///
/// Rows whose assignment columns do not match their type are reported as
/// storage failures.
fn transaction_from_model(
    model: trust_transactions::Model,
) -> Result<TrustTransaction, LedgerError> {
    let kind = TransactionKind::from(model.transaction_type);
    let assignment = match kind {
        TransactionKind::Inflow => {
            if model.student_id.is_some() || model.academic_year_id.is_some() {
                return Err(malformed(&model, "inflow carries a student assignment"));
            }
            None
        }
        TransactionKind::Outflow => {
            let (Some(student_id), Some(academic_year_id), Some(fees_type)) = (
                model.student_id,
                model.academic_year_id,
                model.fees_type.clone(),
            ) else {
                return Err(malformed(&model, "outflow without a complete student assignment"));
            };
            Some(StudentAssignment {
                student_id: StudentId::from_uuid(student_id),
                academic_year_id: AcademicYearId::from_uuid(academic_year_id),
                course_id: model.course_id.map(CourseId::from_uuid),
                academic_year_session: model.academic_year_session.clone(),
                fees_type,
            })
        }
    };

    Ok(TrustTransaction {
        id: TrustTransactionId::from_uuid(model.id),
        trust_id: TrustId::from_uuid(model.trust_id),
        kind,
        amount: model.amount,
        balance_after: model.balance_after,
        notes: model.notes,
        assignment,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn malformed(model: &trust_transactions::Model, reason: &str) -> LedgerError {
    tracing::error!(transaction_id = %model.id, reason, "Malformed trust transaction row");
    LedgerError::Storage(format!("malformed trust transaction {}: {reason}", model.id))
}

fn transaction_to_active_model(tx: &TrustTransaction) -> trust_transactions::ActiveModel {
    let assignment = tx.assignment.as_ref();
    trust_transactions::ActiveModel {
        id: Set(tx.id.into_inner()),
        trust_id: Set(tx.trust_id.into_inner()),
        transaction_type: Set(tx.kind.into()),
        amount: Set(tx.amount),
        balance_after: Set(tx.balance_after),
        notes: Set(tx.notes.clone()),
        student_id: Set(assignment.map(|a| a.student_id.into_inner())),
        academic_year_id: Set(assignment.map(|a| a.academic_year_id.into_inner())),
        course_id: Set(assignment.and_then(|a| a.course_id).map(CourseId::into_inner)),
        academic_year_session: Set(assignment.and_then(|a| a.academic_year_session.clone())),
        fees_type: Set(assignment.map(|a| a.fees_type.clone())),
        created_at: Set(tx.created_at.fixed_offset()),
    }
}
