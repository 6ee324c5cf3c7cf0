//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for trusts, transactions, reports and student search
//! - JSON error responses derived from ledger errors
//! - Response types with amounts rendered as decimal strings

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trustfund_core::ledger::LedgerService;
use trustfund_shared::config::LedgerConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger operations.
    pub ledger: Arc<LedgerService>,
    /// Paging and search limits.
    pub config: LedgerConfig,
}

impl AppState {
    /// Creates the state from a ledger service and its limits.
    #[must_use]
    pub fn new(ledger: LedgerService, config: LedgerConfig) -> Self {
        Self {
            ledger: Arc::new(ledger),
            config,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
