//! LLM provider status and configuration routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bharatexplain_chat::providers;
use bharatexplain_chat::types::{LLMConfigUpdate, TestKeyRequest};
use tracing::warn;

use super::{error_response, ApiResponse};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/llm/status", get(get_status))
        .route("/llm/config", get(get_config).put(update_config))
        .route("/llm/config/test", post(test_key))
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = state.llm_config.read();
    let resolved = config.resolve_provider();

    Json(serde_json::json!({
        "llmAvailable": resolved.is_some(),
        "llmProvider": resolved.as_ref().map(|t| t.provider.to_string()),
        "defaultModel": resolved.as_ref().map(|t| t.model.clone()),
        "availableModels": config.available_models(),
    }))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = state.llm_config.read();
    Json(serde_json::to_value(config.to_response()).unwrap_or_default())
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LLMConfigUpdate>,
) -> ApiResponse {
    // Persist a copy first; the live config only changes once it is on disk.
    let mut updated = state.llm_config.read().clone();
    updated.apply_update(&update);

    if let Err(e) = updated.save() {
        warn!("LLM config not saved: {}", e);
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to save config: {}", e),
        );
    }

    let response = serde_json::to_value(updated.to_response()).unwrap_or_default();
    *state.llm_config.write() = updated;

    (StatusCode::OK, Json(response))
}

async fn test_key(Json(req): Json<TestKeyRequest>) -> Json<serde_json::Value> {
    match providers::test_api_key(&req.provider, &req.api_key).await {
        Ok(()) => Json(serde_json::json!({ "success": true })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e })),
    }
}
