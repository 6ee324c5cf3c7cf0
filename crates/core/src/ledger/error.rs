//! Ledger error types.
//!
//! Every failure of a ledger operation falls into one of four categories:
//! validation, insufficient balance, not found, or storage failure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use trustfund_shared::AppError;
use trustfund_shared::types::{AcademicYearId, CourseId, StudentId, TrustId};

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or missing input; the caller corrects and resubmits.
    Validation,
    /// Business-rule rejection of an outflow.
    InsufficientBalance,
    /// A referenced entity does not exist (possibly stale).
    NotFound,
    /// Backend fault.
    StorageFailure,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount is non-numeric, non-positive, or too precise.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// A required field was not supplied.
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// Trust name is empty.
    #[error("Trust name cannot be empty")]
    InvalidTrustName,

    /// Date range start is after its end.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidDateRange {
        /// Range start.
        from: NaiveDate,
        /// Range end.
        to: NaiveDate,
    },

    /// Applying the amount would push the balance past the storable maximum.
    #[error("Balance limit exceeded in trust {trust_id}: balance {balance}, amount {amount}")]
    BalanceLimitExceeded {
        /// The receiving trust.
        trust_id: TrustId,
        /// Balance before the change.
        balance: Decimal,
        /// Amount requested.
        amount: Decimal,
    },

    // ========== Business Rule Errors ==========
    /// Outflow exceeds the trust balance.
    #[error(
        "Insufficient balance in trust {trust_id}: available {available}, requested {requested}, short by {}",
        .requested - .available
    )]
    InsufficientBalance {
        /// The paying trust.
        trust_id: TrustId,
        /// Balance at the moment the outflow was applied.
        available: Decimal,
        /// Amount requested.
        requested: Decimal,
    },

    // ========== Not Found Errors ==========
    /// Trust not found.
    #[error("Trust not found: {0}")]
    TrustNotFound(TrustId),

    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    /// Course not found.
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    /// Academic-year enrollment not found for the student.
    #[error("Academic year {academic_year_id} not found for student {student_id}")]
    EnrollmentNotFound {
        /// The student.
        student_id: StudentId,
        /// The enrollment looked up.
        academic_year_id: AcademicYearId,
    },

    // ========== Storage Errors ==========
    /// Stored balance disagrees with the transaction history.
    #[error("Balance drift on trust {trust_id}: recorded {recorded}, derived {derived}")]
    BalanceDrift {
        /// The trust.
        trust_id: TrustId,
        /// Balance on the trust row.
        recorded: Decimal,
        /// Balance recomputed from transactions.
        derived: Decimal,
    },

    /// Backend/database error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidAmount(_)
            | Self::MissingRequiredField(_)
            | Self::InvalidTrustName
            | Self::InvalidDateRange { .. }
            | Self::BalanceLimitExceeded { .. } => ErrorCategory::Validation,
            Self::InsufficientBalance { .. } => ErrorCategory::InsufficientBalance,
            Self::TrustNotFound(_)
            | Self::StudentNotFound(_)
            | Self::CourseNotFound(_)
            | Self::EnrollmentNotFound { .. } => ErrorCategory::NotFound,
            Self::BalanceDrift { .. } | Self::Storage(_) => ErrorCategory::StorageFailure,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::MissingRequiredField(_) => "MISSING_REQUIRED_FIELD",
            Self::InvalidTrustName => "INVALID_TRUST_NAME",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::BalanceLimitExceeded { .. } => "BALANCE_LIMIT_EXCEEDED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::TrustNotFound(_) => "TRUST_NOT_FOUND",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::CourseNotFound(_) => "COURSE_NOT_FOUND",
            Self::EnrollmentNotFound { .. } => "ENROLLMENT_NOT_FOUND",
            Self::BalanceDrift { .. } => "BALANCE_DRIFT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::InsufficientBalance => 422,
            ErrorCategory::StorageFailure => 500,
        }
    }

    /// Returns true if a read that failed with this error may be retried.
    ///
    /// Mutations are never retried automatically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Returns how much an outflow was short by.
    #[must_use]
    pub fn shortfall(&self) -> Option<Decimal> {
        match self {
            Self::InsufficientBalance {
                available,
                requested,
                ..
            } => Some(*requested - *available),
            _ => None,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.category() {
            ErrorCategory::Validation => Self::Validation(message),
            ErrorCategory::InsufficientBalance => Self::BusinessRule(message),
            ErrorCategory::NotFound => Self::NotFound(message),
            ErrorCategory::StorageFailure => Self::Database(message),
        }
    }
}
