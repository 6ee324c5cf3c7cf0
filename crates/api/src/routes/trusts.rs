//! Trust management routes.
//!
//! Creating trusts, recording inflows, assigning money to students and
//! reconciling a trust's balance against its history.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use trustfund_core::ledger::{
    InflowInput, LedgerError, OutflowInput, Reconciliation, Trust, validation::parse_amount,
};
use trustfund_shared::types::{AcademicYearId, StudentId, TrustId, format_money};

use super::transactions::TransactionResponse;
use crate::AppState;
use crate::error::ledger_error_response;

/// Creates the trust routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trusts", get(list_trusts).post(create_trust))
        .route("/trusts/{trust_id}", get(get_trust))
        .route("/trusts/{trust_id}/inflows", post(create_inflow))
        .route("/trusts/{trust_id}/assignments", post(create_assignment))
        .route("/trusts/{trust_id}/reconciliation", get(get_reconciliation))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a trust.
#[derive(Debug, Deserialize)]
pub struct CreateTrustRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    pub details: Option<String>,
}

/// A monetary amount as sent by clients: `"5000.00"` or `5000`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// Decimal string.
    Text(String),
    /// JSON number.
    Number(serde_json::Number),
}

impl AmountInput {
    fn parse(&self) -> Result<Decimal, LedgerError> {
        match self {
            Self::Text(text) => parse_amount(text),
            Self::Number(number) => parse_amount(&number.to_string()),
        }
    }
}

/// Parses a required amount field.
fn required_amount(amount: Option<&AmountInput>) -> Result<Decimal, LedgerError> {
    amount
        .ok_or(LedgerError::MissingRequiredField("amount"))?
        .parse()
}

/// Request body for an inflow.
#[derive(Debug, Deserialize)]
pub struct InflowRequest {
    /// Amount to add.
    pub amount: Option<AmountInput>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Request body for assigning money to a student.
#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    /// Receiving student.
    pub student_id: Option<StudentId>,
    /// Student's academic-year enrollment.
    pub academic_year_id: Option<AcademicYearId>,
    /// Amount to assign.
    pub amount: Option<AmountInput>,
    /// Fee head (e.g. "Tuition").
    pub fees_type: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Response for a trust.
#[derive(Debug, Serialize)]
pub struct TrustResponse {
    /// Trust ID.
    pub id: TrustId,
    /// Display name.
    pub name: String,
    /// Current balance.
    pub balance: String,
    /// Free-form description.
    pub details: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl From<Trust> for TrustResponse {
    fn from(trust: Trust) -> Self {
        Self {
            id: trust.id,
            name: trust.name,
            balance: format_money(trust.balance),
            details: trust.details,
            created_at: trust.created_at.to_rfc3339(),
            updated_at: trust.updated_at.to_rfc3339(),
        }
    }
}

/// Response for a reconciliation check.
#[derive(Debug, Serialize)]
pub struct ReconciliationResponse {
    /// Trust ID.
    pub trust_id: TrustId,
    /// Balance stored on the trust.
    pub recorded_balance: String,
    /// Balance recomputed from the history.
    pub derived_balance: String,
    /// Sum of inflows.
    pub total_inflow: String,
    /// Sum of outflows.
    pub total_outflow: String,
    /// Number of transactions examined.
    pub transaction_count: usize,
    /// Whether both balances agree.
    pub consistent: bool,
}

impl From<Reconciliation> for ReconciliationResponse {
    fn from(report: Reconciliation) -> Self {
        Self {
            consistent: report.is_consistent(),
            trust_id: report.trust_id,
            recorded_balance: format_money(report.recorded_balance),
            derived_balance: format_money(report.derived_balance),
            total_inflow: format_money(report.total_inflow),
            total_outflow: format_money(report.total_outflow),
            transaction_count: report.transaction_count,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/trusts` - List trusts ordered by name.
async fn list_trusts(State(state): State<AppState>) -> Response {
    match state.ledger.list_trusts().await {
        Ok(trusts) => {
            let items: Vec<TrustResponse> = trusts.into_iter().map(TrustResponse::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/trusts` - Create a trust with a zero balance.
async fn create_trust(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrustRequest>,
) -> Response {
    match state.ledger.create_trust(&payload.name, payload.details).await {
        Ok(trust) => (StatusCode::CREATED, Json(TrustResponse::from(trust))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/trusts/{trust_id}` - Fetch a trust and its current balance.
async fn get_trust(State(state): State<AppState>, Path(trust_id): Path<TrustId>) -> Response {
    match state.ledger.get_trust(trust_id).await {
        Ok(trust) => (StatusCode::OK, Json(TrustResponse::from(trust))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/trusts/{trust_id}/inflows` - Add money to a trust.
async fn create_inflow(
    State(state): State<AppState>,
    Path(trust_id): Path<TrustId>,
    Json(payload): Json<InflowRequest>,
) -> Response {
    let amount = match required_amount(payload.amount.as_ref()) {
        Ok(amount) => amount,
        Err(e) => return ledger_error_response(&e),
    };

    let input = InflowInput {
        trust_id,
        amount,
        notes: payload.notes,
    };
    match state.ledger.apply_inflow(input).await {
        Ok(tx) => {
            info!(transaction_id = %tx.id, "Inflow accepted");
            (StatusCode::CREATED, Json(TransactionResponse::from(tx))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/trusts/{trust_id}/assignments` - Assign money to a student.
async fn create_assignment(
    State(state): State<AppState>,
    Path(trust_id): Path<TrustId>,
    Json(payload): Json<AssignmentRequest>,
) -> Response {
    let amount = match required_amount(payload.amount.as_ref()) {
        Ok(amount) => amount,
        Err(e) => return ledger_error_response(&e),
    };

    let input = OutflowInput {
        trust_id: Some(trust_id),
        student_id: payload.student_id,
        academic_year_id: payload.academic_year_id,
        amount,
        fees_type: payload.fees_type,
        notes: payload.notes,
    };
    match state.ledger.apply_outflow(input).await {
        Ok(tx) => {
            info!(transaction_id = %tx.id, "Assignment accepted");
            (StatusCode::CREATED, Json(TransactionResponse::from(tx))).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/trusts/{trust_id}/reconciliation` - Check the balance against history.
async fn get_reconciliation(
    State(state): State<AppState>,
    Path(trust_id): Path<TrustId>,
) -> Response {
    match state.ledger.reconcile_trust(trust_id).await {
        Ok(report) => (StatusCode::OK, Json(ReconciliationResponse::from(report))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}
