//! JSON error responses.
//!
//! Every failure leaves the API as `{ "error": <code>, "message": <text> }`
//! with a status derived from the error category. Storage failures are logged
//! and reported generically.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use trustfund_core::ledger::LedgerError;
use trustfund_shared::types::format_money;

/// Converts a ledger error into an HTTP response.
pub fn ledger_error_response(err: &LedgerError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = err.error_code().to_lowercase();

    if status.is_server_error() {
        error!(error = %err, code = %code, "Ledger operation failed");
        return (
            status,
            Json(json!({
                "error": code,
                "message": "An error occurred"
            })),
        )
            .into_response();
    }

    let body = match err {
        LedgerError::InsufficientBalance {
            trust_id,
            available,
            requested,
        } => json!({
            "error": code,
            "message": err.to_string(),
            "trust_id": trust_id,
            "available": format_money(*available),
            "requested": format_money(*requested),
            "shortfall": format_money(*requested - *available),
        }),
        _ => json!({
            "error": code,
            "message": err.to_string(),
        }),
    };
    (status, Json(body)).into_response()
}

/// Builds a 400 response for malformed request parameters.
pub fn bad_request(code: &str, message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}
