//! Student search route used when picking an assignment recipient.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::AppState;
use crate::error::ledger_error_response;

/// Creates the student routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/students", get(search_students))
}

/// Query parameters for student search.
#[derive(Debug, Deserialize)]
pub struct StudentSearchQuery {
    /// Name or roll number fragment.
    #[serde(default)]
    pub q: String,
    /// Maximum number of results.
    pub limit: Option<u64>,
}

/// GET `/students` - Search students by name or roll number.
async fn search_students(
    State(state): State<AppState>,
    Query(query): Query<StudentSearchQuery>,
) -> Response {
    let max = state.config.student_search_limit;
    let limit = query.limit.unwrap_or(max).clamp(1, max.max(1));

    match state.ledger.search_students(&query.q, limit).await {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}
