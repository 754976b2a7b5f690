//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for customer ledgers
//! - JSON error responses mapped from ledger errors
//! - CSV statement downloads

pub mod routes;

use axum::Router;
use haulbook_core::ledger::LedgerStore;
use haulbook_shared::config::LedgerConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Ledger store every request opens its session against.
    pub store: Arc<dyn LedgerStore>,
    /// Ledger settings (delete save delay, currency label).
    pub ledger: LedgerConfig,
}

impl AppState {
    /// Creates state around a store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, ledger: LedgerConfig) -> Self {
        Self { store, ledger }
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
