//! Transaction filtering for reports and list views.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use trustfund_shared::types::{CourseId, TrustId};

use crate::ledger::{LedgerError, TransactionKind, TrustTransaction};

/// Inclusive range of calendar dates, in UTC.
///
/// Either end may be open. The end date covers its whole day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range, rejecting one whose start is after its end.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, LedgerError> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    /// A range with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            from: None,
            to: None,
        }
    }

    /// Checks that the range is not inverted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if `from > to`.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(LedgerError::InvalidDateRange { from, to }),
            _ => Ok(()),
        }
    }

    /// Returns `(start, end)` instants: start inclusive, end exclusive.
    ///
    /// The end is midnight following the `to` date.
    #[must_use]
    pub fn bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self
            .from
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        let end = self
            .to
            .and_then(|d| d.succ_opt())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        (start, end)
    }

    /// Returns true if `instant` falls inside the range.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        start.is_none_or(|s| instant >= s) && end.is_none_or(|e| instant < e)
    }

    /// Returns true if neither end is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Predicates applied to a transaction list.
///
/// Every set field must match; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// Only this trust.
    pub trust_id: Option<TrustId>,
    /// Only outflows assigned to this course.
    pub course_id: Option<CourseId>,
    /// Only this direction.
    pub kind: Option<TransactionKind>,
    /// Only transactions created in this range.
    pub date_range: DateRange,
}

impl TransactionFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one trust.
    #[must_use]
    pub const fn for_trust(mut self, trust_id: TrustId) -> Self {
        self.trust_id = Some(trust_id);
        self
    }

    /// Restricts to one course.
    #[must_use]
    pub const fn for_course(mut self, course_id: CourseId) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// Restricts to one direction.
    #[must_use]
    pub const fn of_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restricts to a date range.
    #[must_use]
    pub const fn within(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Checks the filter is well formed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` for an inverted range.
    pub fn validate(&self) -> Result<(), LedgerError> {
        self.date_range.validate()
    }

    /// Returns true if `tx` passes every predicate.
    #[must_use]
    pub fn matches(&self, tx: &TrustTransaction) -> bool {
        self.trust_id.is_none_or(|id| tx.trust_id == id)
            && self.course_id.is_none_or(|id| tx.course_id() == Some(id))
            && self.kind.is_none_or(|kind| tx.kind == kind)
            && self.date_range.contains(tx.created_at)
    }
}
