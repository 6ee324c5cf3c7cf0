//! Transaction listing routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use trustfund_core::ledger::TrustTransaction;
use trustfund_shared::config::LedgerConfig;
use trustfund_shared::types::{
    AcademicYearId, CourseId, PageRequest, StudentId, TrustId, TrustTransactionId, format_money,
};

use super::LedgerQuery;
use crate::AppState;
use crate::error::ledger_error_response;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transactions", get(list_transactions))
}

/// Response for a recorded transaction.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Transaction ID.
    pub id: TrustTransactionId,
    /// Affected trust.
    pub trust_id: TrustId,
    /// "inflow" or "outflow".
    #[serde(rename = "type")]
    pub transaction_type: &'static str,
    /// Amount.
    pub amount: String,
    /// Trust balance right after this transaction.
    pub balance_after: String,
    /// Notes.
    pub notes: Option<String>,
    /// Receiving student (outflows only).
    pub student_id: Option<StudentId>,
    /// Student's academic-year enrollment (outflows only).
    pub academic_year_id: Option<AcademicYearId>,
    /// Course of the enrollment (outflows only).
    pub course_id: Option<CourseId>,
    /// Session of the enrollment (outflows only).
    pub academic_year_session: Option<String>,
    /// Fee head (outflows only).
    pub fees_type: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<TrustTransaction> for TransactionResponse {
    fn from(tx: TrustTransaction) -> Self {
        let assignment = tx.assignment;
        Self {
            id: tx.id,
            trust_id: tx.trust_id,
            transaction_type: tx.kind.as_str(),
            amount: format_money(tx.amount),
            balance_after: format_money(tx.balance_after),
            notes: tx.notes,
            student_id: assignment.as_ref().map(|a| a.student_id),
            academic_year_id: assignment.as_ref().map(|a| a.academic_year_id),
            course_id: assignment.as_ref().and_then(|a| a.course_id),
            academic_year_session: assignment
                .as_ref()
                .and_then(|a| a.academic_year_session.clone()),
            fees_type: assignment.map(|a| a.fees_type),
            created_at: tx.created_at.to_rfc3339(),
        }
    }
}

/// Resolves the requested page against the configured limits.
pub(crate) fn page_request(query: &LedgerQuery, config: &LedgerConfig) -> PageRequest {
    PageRequest::new(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(config.default_page_size),
    )
    .clamped(config.max_page_size)
}

/// GET `/transactions` - List transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> Response {
    let filter = match query.filter() {
        Ok(filter) => filter,
        Err(response) => return response,
    };
    let page = page_request(&query, &state.config);

    match state.ledger.list_transactions(&filter, page).await {
        Ok(result) => {
            (StatusCode::OK, Json(result.map(TransactionResponse::from))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}
