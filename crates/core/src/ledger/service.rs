//! Ledger service.
//!
//! Validates requests, resolves directory references and hands the resulting
//! [`PendingTransaction`] to the store's atomic commit. Reads go through the
//! same service so every caller sees one consistent API.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, warn};
use trustfund_shared::types::{CourseId, PageRequest, PageResponse, TrustId};

use super::balance::{reconcile, running_balances_consistent};
use super::error::LedgerError;
use super::store::LedgerStore;
use super::types::{
    InflowInput, NewTrust, OutflowInput, PendingTransaction, Reconciliation, StudentAssignment,
    Trust, TrustTransaction,
};
use super::validation::{
    normalize_notes, require_field, require_text, validate_amount, validate_trust_name,
};
use crate::directory::{Directory, Student};
use crate::reports::{
    CourseDetail, CourseSummary, DailyTotal, ReportService, TransactionFilter, TrustSummary,
};

/// Entry point for every ledger operation.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
    directory: Arc<dyn Directory>,
}

impl LedgerService {
    /// Creates a service over `store` and `directory`.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, directory: Arc<dyn Directory>) -> Self {
        Self { store, directory }
    }

    /// Creates a trust with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTrustName` for a blank name.
    pub async fn create_trust(
        &self,
        name: &str,
        details: Option<String>,
    ) -> Result<Trust, LedgerError> {
        let name = validate_trust_name(name)?;
        let trust = self
            .store
            .create_trust(NewTrust {
                name,
                details: normalize_notes(details),
            })
            .await?;
        info!(trust_id = %trust.id, name = %trust.name, "Trust created");
        Ok(trust)
    }

    /// Fetches a trust.
    ///
    /// # Errors
    ///
    /// Returns `TrustNotFound` if it does not exist.
    pub async fn get_trust(&self, id: TrustId) -> Result<Trust, LedgerError> {
        self.store
            .get_trust(id)
            .await?
            .ok_or(LedgerError::TrustNotFound(id))
    }

    /// Lists all trusts ordered by name.
    pub async fn list_trusts(&self) -> Result<Vec<Trust>, LedgerError> {
        self.store.list_trusts().await
    }

    /// Adds money to a trust.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive or too precise
    /// - `TrustNotFound` if the trust does not exist
    pub async fn apply_inflow(&self, input: InflowInput) -> Result<TrustTransaction, LedgerError> {
        let amount = validate_amount(input.amount)?;
        let notes = normalize_notes(input.notes);
        let pending = PendingTransaction::inflow(input.trust_id, amount, notes);

        let (trust, tx) = self.store.commit(pending).await?;
        info!(
            trust_id = %trust.id,
            transaction_id = %tx.id,
            amount = %tx.amount,
            balance = %trust.balance,
            "Inflow recorded"
        );
        Ok(tx)
    }

    /// Assigns money from a trust to a student's academic-year enrollment.
    ///
    /// The enrollment's course and session are snapshotted onto the
    /// transaction.
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` if a reference or the fees type is absent
    /// - `InvalidAmount` if the amount is not positive or too precise
    /// - `TrustNotFound`, `StudentNotFound`, `EnrollmentNotFound` for
    ///   dangling references
    /// - `InsufficientBalance` if the trust cannot cover the amount at the
    ///   moment the outflow is applied
    pub async fn apply_outflow(
        &self,
        input: OutflowInput,
    ) -> Result<TrustTransaction, LedgerError> {
        let trust_id = require_field(input.trust_id, "trust_id")?;
        let student_id = require_field(input.student_id, "student_id")?;
        let academic_year_id = require_field(input.academic_year_id, "academic_year_id")?;
        let fees_type = require_text(input.fees_type.as_deref(), "fees_type")?;
        let amount = validate_amount(input.amount)?;

        self.get_trust(trust_id).await?;
        if self.directory.find_student(student_id).await?.is_none() {
            return Err(LedgerError::StudentNotFound(student_id));
        }
        let enrollment = self
            .directory
            .find_enrollment(student_id, academic_year_id)
            .await?
            .ok_or(LedgerError::EnrollmentNotFound {
                student_id,
                academic_year_id,
            })?;

        let pending = PendingTransaction::outflow(
            trust_id,
            amount,
            normalize_notes(input.notes),
            StudentAssignment {
                student_id,
                academic_year_id,
                course_id: Some(enrollment.course.id),
                academic_year_session: Some(enrollment.session),
                fees_type,
            },
        );

        match self.store.commit(pending).await {
            Ok((trust, tx)) => {
                info!(
                    trust_id = %trust.id,
                    transaction_id = %tx.id,
                    student_id = %student_id,
                    amount = %tx.amount,
                    balance = %trust.balance,
                    "Outflow recorded"
                );
                Ok(tx)
            }
            Err(err @ LedgerError::InsufficientBalance { .. }) => {
                warn!(trust_id = %trust_id, error = %err, "Outflow rejected");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Lists one page of transactions matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` for an inverted range.
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<TrustTransaction>, LedgerError> {
        filter.validate()?;
        let transactions = self.store.list_transactions(filter).await?;
        Ok(page.paginate(transactions))
    }

    /// Outflow totals per course.
    pub async fn course_summary(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CourseSummary>, LedgerError> {
        filter.validate()?;
        let (transactions, courses) = tokio::try_join!(
            self.store.list_transactions(filter),
            self.directory.list_courses()
        )?;
        Ok(ReportService::summarize_by_course(&transactions, filter, &courses))
    }

    /// Outflows of a single course with their total.
    ///
    /// # Errors
    ///
    /// Returns `CourseNotFound` if the course is not in the directory.
    pub async fn course_detail(
        &self,
        course_id: CourseId,
        filter: &TransactionFilter,
    ) -> Result<CourseDetail, LedgerError> {
        filter.validate()?;
        let course = self
            .directory
            .list_courses()
            .await?
            .into_iter()
            .find(|c| c.id == course_id)
            .ok_or(LedgerError::CourseNotFound(course_id))?;
        let transactions = self
            .store
            .list_transactions(&filter.clone().for_course(course_id))
            .await?;
        Ok(ReportService::detail_for_course(&transactions, &course, filter))
    }

    /// Inflow and outflow totals per trust.
    pub async fn trust_summary(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TrustSummary>, LedgerError> {
        filter.validate()?;
        let (transactions, trusts) = tokio::try_join!(
            self.store.list_transactions(filter),
            self.store.list_trusts()
        )?;
        Ok(ReportService::summarize_by_trust(&transactions, filter, &trusts))
    }

    /// Inflow and outflow totals per day.
    pub async fn daily_totals(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<DailyTotal>, LedgerError> {
        filter.validate()?;
        let transactions = self.store.list_transactions(filter).await?;
        Ok(ReportService::daily_totals(&transactions, filter))
    }

    /// Recomputes a trust's balance from its history.
    ///
    /// # Errors
    ///
    /// Returns `BalanceDrift` if the stored balance, the derived balance and
    /// the running `balance_after` chain disagree.
    pub async fn reconcile_trust(&self, trust_id: TrustId) -> Result<Reconciliation, LedgerError> {
        let trust = self.get_trust(trust_id).await?;
        let mut history = self
            .store
            .list_transactions(&TransactionFilter::new().for_trust(trust_id))
            .await?;
        history.reverse();

        let report = reconcile(trust_id, trust.balance, &history);
        let last_recorded = history.last().map_or(Decimal::ZERO, |tx| tx.balance_after);
        if !report.is_consistent()
            || last_recorded != trust.balance
            || !running_balances_consistent(&history)
        {
            error!(
                trust_id = %trust_id,
                recorded = %report.recorded_balance,
                derived = %report.derived_balance,
                "Balance drift detected"
            );
            return Err(LedgerError::BalanceDrift {
                trust_id,
                recorded: report.recorded_balance,
                derived: report.derived_balance,
            });
        }
        Ok(report)
    }

    /// Searches students by name or roll number.
    pub async fn search_students(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<Student>, LedgerError> {
        self.directory.search_students(query, limit).await
    }
}
