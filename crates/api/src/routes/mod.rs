//! API route definitions.

use axum::{Router, response::Response};
use chrono::NaiveDate;
use serde::Deserialize;
use trustfund_core::ledger::TransactionKind;
use trustfund_core::reports::{DateRange, TransactionFilter};
use trustfund_shared::types::{CourseId, TrustId};

use crate::AppState;
use crate::error::{bad_request, ledger_error_response};

pub mod health;
pub mod reports;
pub mod students;
pub mod transactions;
pub mod trusts;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(trusts::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
        .merge(students::routes())
}

/// Filter parameters shared by transaction listings and reports.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    /// Only this trust.
    pub trust_id: Option<TrustId>,
    /// Only outflows assigned to this course.
    pub course_id: Option<CourseId>,
    /// "inflow" or "outflow".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// Range start (YYYY-MM-DD), inclusive.
    pub from: Option<NaiveDate>,
    /// Range end (YYYY-MM-DD), inclusive.
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

impl LedgerQuery {
    /// Builds the transaction filter, or the 400 response to return instead.
    pub(crate) fn filter(&self) -> Result<TransactionFilter, Response> {
        let date_range = DateRange::new(self.from, self.to).map_err(|e| ledger_error_response(&e))?;
        let mut filter = TransactionFilter::new().within(date_range);
        if let Some(trust_id) = self.trust_id {
            filter = filter.for_trust(trust_id);
        }
        if let Some(course_id) = self.course_id {
            filter = filter.for_course(course_id);
        }
        if let Some(raw) = self.transaction_type.as_deref() {
            let kind = raw
                .parse::<TransactionKind>()
                .map_err(|message| bad_request("invalid_transaction_type", message))?;
            filter = filter.of_kind(kind);
        }
        Ok(filter)
    }
}
