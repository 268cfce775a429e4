//! HTTP route handlers.

pub mod explain;
pub mod llm;
pub mod topics;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(topics::routes())
        .merge(explain::routes())
        .merge(llm::routes())
}

pub(crate) type ApiResponse = (StatusCode, Json<serde_json::Value>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
}
