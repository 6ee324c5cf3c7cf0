//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use trustfund_shared::types::{CourseId, TrustId};

use crate::ledger::TrustTransaction;

/// Outflow totals for one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    /// Course ID.
    pub course_id: CourseId,
    /// Course name.
    pub course_name: String,
    /// Sum of outflows assigned to the course.
    pub total_outflow: Decimal,
    /// Number of outflows assigned to the course.
    pub transaction_count: usize,
}

/// Drill-down for a single course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDetail {
    /// Course ID.
    pub course_id: CourseId,
    /// Course name.
    pub course_name: String,
    /// Sum of the listed outflows.
    pub total_outflow: Decimal,
    /// Matching outflows, newest first.
    pub transactions: Vec<TrustTransaction>,
}

/// Inflow and outflow totals for one trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSummary {
    /// Trust ID.
    pub trust_id: TrustId,
    /// Trust name.
    pub trust_name: String,
    /// Sum of inflows.
    pub total_inflow: Decimal,
    /// Sum of outflows.
    pub total_outflow: Decimal,
    /// Inflow minus outflow.
    pub net: Decimal,
    /// Number of transactions.
    pub transaction_count: usize,
}

/// Inflow and outflow totals for one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// The day.
    pub date: NaiveDate,
    /// Sum of inflows.
    pub total_inflow: Decimal,
    /// Sum of outflows.
    pub total_outflow: Decimal,
    /// Number of transactions.
    pub transaction_count: usize,
}

/// Totals over a whole transaction list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Sum of inflows.
    pub total_inflow: Decimal,
    /// Sum of outflows.
    pub total_outflow: Decimal,
    /// Inflow minus outflow.
    pub net: Decimal,
    /// Number of transactions.
    pub transaction_count: usize,
}
