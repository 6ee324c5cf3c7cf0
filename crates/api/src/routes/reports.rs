//! Report routes.
//!
//! Course summaries and drill-downs, per-trust totals and per-day totals.
//! All reports accept the same filters as the transaction listing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use trustfund_core::reports::{CourseDetail, CourseSummary, DailyTotal, TrustSummary};
use trustfund_shared::types::{CourseId, TrustId, format_money};

use super::LedgerQuery;
use super::transactions::TransactionResponse;
use crate::AppState;
use crate::error::ledger_error_response;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/courses", get(course_summary))
        .route("/reports/courses/{course_id}", get(course_detail))
        .route("/reports/trusts", get(trust_summary))
        .route("/reports/daily", get(daily_totals))
}

// ============================================================================
// Response Types
// ============================================================================

/// One row of the course summary.
#[derive(Debug, Serialize)]
pub struct CourseSummaryResponse {
    /// Course ID.
    pub course_id: CourseId,
    /// Course name.
    pub course_name: String,
    /// Total assigned to the course.
    pub total_outflow: String,
    /// Number of outflows.
    pub transaction_count: usize,
}

impl From<CourseSummary> for CourseSummaryResponse {
    fn from(row: CourseSummary) -> Self {
        Self {
            course_id: row.course_id,
            course_name: row.course_name,
            total_outflow: format_money(row.total_outflow),
            transaction_count: row.transaction_count,
        }
    }
}

/// Drill-down for one course.
#[derive(Debug, Serialize)]
pub struct CourseDetailResponse {
    /// Course ID.
    pub course_id: CourseId,
    /// Course name.
    pub course_name: String,
    /// Total of the listed outflows.
    pub total_outflow: String,
    /// Outflows, newest first.
    pub transactions: Vec<TransactionResponse>,
}

impl From<CourseDetail> for CourseDetailResponse {
    fn from(detail: CourseDetail) -> Self {
        Self {
            course_id: detail.course_id,
            course_name: detail.course_name,
            total_outflow: format_money(detail.total_outflow),
            transactions: detail
                .transactions
                .into_iter()
                .map(TransactionResponse::from)
                .collect(),
        }
    }
}

/// One row of the trust summary.
#[derive(Debug, Serialize)]
pub struct TrustSummaryResponse {
    /// Trust ID.
    pub trust_id: TrustId,
    /// Trust name.
    pub trust_name: String,
    /// Sum of inflows.
    pub total_inflow: String,
    /// Sum of outflows.
    pub total_outflow: String,
    /// Inflow minus outflow.
    pub net: String,
    /// Number of transactions.
    pub transaction_count: usize,
}

impl From<TrustSummary> for TrustSummaryResponse {
    fn from(row: TrustSummary) -> Self {
        Self {
            trust_id: row.trust_id,
            trust_name: row.trust_name,
            total_inflow: format_money(row.total_inflow),
            total_outflow: format_money(row.total_outflow),
            net: format_money(row.net),
            transaction_count: row.transaction_count,
        }
    }
}

/// One row of the daily totals.
#[derive(Debug, Serialize)]
pub struct DailyTotalResponse {
    /// Day (YYYY-MM-DD, UTC).
    pub date: String,
    /// Sum of inflows.
    pub total_inflow: String,
    /// Sum of outflows.
    pub total_outflow: String,
    /// Number of transactions.
    pub transaction_count: usize,
}

impl From<DailyTotal> for DailyTotalResponse {
    fn from(row: DailyTotal) -> Self {
        Self {
            date: row.date.to_string(),
            total_inflow: format_money(row.total_inflow),
            total_outflow: format_money(row.total_outflow),
            transaction_count: row.transaction_count,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/reports/courses` - Outflow totals per course.
async fn course_summary(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    match state.ledger.course_summary(&filter).await {
        Ok(rows) => {
            let rows: Vec<CourseSummaryResponse> =
                rows.into_iter().map(CourseSummaryResponse::from).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/reports/courses/{course_id}` - Outflows of one course.
async fn course_detail(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    Query(query): Query<LedgerQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    match state.ledger.course_detail(course_id, &filter).await {
        Ok(detail) => (StatusCode::OK, Json(CourseDetailResponse::from(detail))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/reports/trusts` - Inflow and outflow totals per trust.
async fn trust_summary(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    match state.ledger.trust_summary(&filter).await {
        Ok(rows) => {
            let rows: Vec<TrustSummaryResponse> =
                rows.into_iter().map(TrustSummaryResponse::from).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/reports/daily` - Inflow and outflow totals per day.
async fn daily_totals(State(state): State<AppState>, Query(query): Query<LedgerQuery>) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    match state.ledger.daily_totals(&filter).await {
        Ok(rows) => {
            let rows: Vec<DailyTotalResponse> =
                rows.into_iter().map(DailyTotalResponse::from).collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}
