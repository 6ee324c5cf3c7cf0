//! Trust ledger domain types.
//!
//! A trust holds a single non-negative balance. Every change to that balance
//! is an immutable [`TrustTransaction`]: an inflow adds money, an outflow
//! assigns money to one student's academic-year enrollment.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trustfund_shared::types::{AcademicYearId, CourseId, StudentId, TrustId, TrustTransactionId};

/// Direction of a trust transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received into the trust.
    Inflow,
    /// Money assigned out of the trust to a student.
    Outflow,
}

impl TransactionKind {
    /// Returns the wire/database name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inflow => "inflow",
            Self::Outflow => "outflow",
        }
    }

    /// Returns the signed effect of `amount` on a trust balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Inflow => amount,
            Self::Outflow => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inflow" => Ok(Self::Inflow),
            "outflow" => Ok(Self::Outflow),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// A named fund with a monetary balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trust {
    /// The trust ID.
    pub id: TrustId,
    /// Display name (not unique).
    pub name: String,
    /// Current balance, never negative.
    pub balance: Decimal,
    /// Free-form description.
    pub details: Option<String>,
    /// When the trust was created.
    pub created_at: DateTime<Utc>,
    /// When the balance last changed.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a trust.
#[derive(Debug, Clone)]
pub struct NewTrust {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub details: Option<String>,
}

/// Student enrollment an outflow is assigned to.
///
/// `course_id` and `academic_year_session` are snapshotted from the directory
/// when the outflow is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAssignment {
    /// The receiving student.
    pub student_id: StudentId,
    /// The student's academic-year enrollment.
    pub academic_year_id: AcademicYearId,
    /// Course the enrollment belongs to.
    pub course_id: Option<CourseId>,
    /// Session label of the enrollment (e.g. "2025-26").
    pub academic_year_session: Option<String>,
    /// Fee head the money is assigned to (e.g. "Tuition").
    pub fees_type: String,
}

/// Input for an inflow.
#[derive(Debug, Clone)]
pub struct InflowInput {
    /// Receiving trust.
    pub trust_id: TrustId,
    /// Amount, must be positive.
    pub amount: Decimal,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Input for an outflow to a student.
///
/// Reference fields are optional here so that missing values surface as
/// `MissingRequiredField` rather than as a deserialization failure.
#[derive(Debug, Clone, Default)]
pub struct OutflowInput {
    /// Paying trust.
    pub trust_id: Option<TrustId>,
    /// Receiving student.
    pub student_id: Option<StudentId>,
    /// Student's academic-year enrollment.
    pub academic_year_id: Option<AcademicYearId>,
    /// Amount, must be positive and covered by the trust balance.
    pub amount: Decimal,
    /// Fee head.
    pub fees_type: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// A validated balance change that has not been recorded yet.
///
/// Only the ledger service builds these; stores turn them into
/// [`TrustTransaction`]s inside their atomic commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Affected trust.
    pub trust_id: TrustId,
    /// Direction.
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Optional notes.
    pub notes: Option<String>,
    /// Present for outflows, absent for inflows.
    pub assignment: Option<StudentAssignment>,
}

impl PendingTransaction {
    /// Builds a pending inflow.
    #[must_use]
    pub(crate) fn inflow(trust_id: TrustId, amount: Decimal, notes: Option<String>) -> Self {
        Self {
            trust_id,
            kind: TransactionKind::Inflow,
            amount,
            notes,
            assignment: None,
        }
    }

    /// Builds a pending outflow.
    #[must_use]
    pub(crate) fn outflow(
        trust_id: TrustId,
        amount: Decimal,
        notes: Option<String>,
        assignment: StudentAssignment,
    ) -> Self {
        Self {
            trust_id,
            kind: TransactionKind::Outflow,
            amount,
            notes,
            assignment: Some(assignment),
        }
    }

    /// Returns the signed change this transaction makes to the balance.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// An immutable, recorded trust transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustTransaction {
    /// Time-ordered ID assigned by the recorder.
    pub id: TrustTransactionId,
    /// Affected trust.
    pub trust_id: TrustId,
    /// Direction.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Trust balance right after this transaction.
    pub balance_after: Decimal,
    /// Optional notes.
    pub notes: Option<String>,
    /// Present for outflows, absent for inflows.
    pub assignment: Option<StudentAssignment>,
    /// Server-assigned timestamp.
    pub created_at: DateTime<Utc>,
}

impl TrustTransaction {
    /// Returns the signed change this transaction made to the balance.
    #[must_use]
    pub fn delta(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// Returns the course of an outflow, if it was resolved.
    #[must_use]
    pub fn course_id(&self) -> Option<CourseId> {
        self.assignment.as_ref().and_then(|a| a.course_id)
    }

    /// Returns true if this is an outflow.
    #[must_use]
    pub fn is_outflow(&self) -> bool {
        self.kind == TransactionKind::Outflow
    }
}

/// Result of comparing a trust's stored balance with its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// The trust checked.
    pub trust_id: TrustId,
    /// Balance as stored on the trust.
    pub recorded_balance: Decimal,
    /// `sum(inflow) - sum(outflow)` over the history.
    pub derived_balance: Decimal,
    /// Total inflow.
    pub total_inflow: Decimal,
    /// Total outflow.
    pub total_outflow: Decimal,
    /// Number of transactions examined.
    pub transaction_count: usize,
}

impl Reconciliation {
    /// Returns true if the stored balance matches the history.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.recorded_balance == self.derived_balance
    }
}
