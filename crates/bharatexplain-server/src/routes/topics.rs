//! Reference data, topic validation and autocomplete routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bharatexplain_core::{DifficultyLevel, TopicCategory, TRANSLATION_LANGUAGES};
use serde::Deserialize;
use tracing::debug;

use super::{error_response, ApiResponse};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/categories", get(list_categories))
        .route("/difficulties", get(list_difficulties))
        .route("/languages", get(list_languages))
        .route("/validate", post(validate_topic))
        .route("/classify", post(classify_topic))
        .route("/suggest", get(suggest_topics))
}

// ---------------------------------------------------------------
// Request types
// ---------------------------------------------------------------

#[derive(Deserialize)]
struct ValidateBody {
    topic: String,
    category: String,
}

#[derive(Deserialize)]
struct ClassifyBody {
    topic: String,
}

#[derive(Deserialize)]
struct SuggestQuery {
    category: String,
    #[serde(default)]
    q: String,
}

// ---------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "keywords": state.validator.matcher().table().keyword_count(),
        "llmAvailable": state.resolve_target().is_some(),
    }))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let table = state.validator.matcher().table();
    let categories: Vec<_> = TopicCategory::ALL
        .iter()
        .map(|c| {
            serde_json::json!({
                "value": c,
                "label": c.label(),
                "icon": c.icon(),
                "validated": table.label_for(*c).is_some(),
            })
        })
        .collect();
    Json(serde_json::json!({ "categories": categories }))
}

async fn list_difficulties() -> Json<serde_json::Value> {
    let levels: Vec<_> = DifficultyLevel::ALL
        .iter()
        .map(|d| {
            serde_json::json!({
                "value": d,
                "label": d.label(),
                "description": d.description(),
            })
        })
        .collect();
    Json(serde_json::json!({ "difficulties": levels }))
}

async fn list_languages() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "languages": TRANSLATION_LANGUAGES }))
}

// ---------------------------------------------------------------
// Validation
// ---------------------------------------------------------------

/// Category names are matched case-insensitively; unknown ones are a 400.
fn parse_category(raw: &str) -> Result<TopicCategory, ApiResponse> {
    raw.parse::<TopicCategory>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.to_string()))
}

/// POST /api/validate — advisory topic/category check.
async fn validate_topic(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ValidateBody>,
) -> ApiResponse {
    let category = match parse_category(&body.category) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let outcome = state.validator.validate(&body.topic, category);
    let mut response = serde_json::to_value(&outcome).unwrap_or_default();
    response["valid"] = serde_json::json!(outcome.is_valid());
    (StatusCode::OK, Json(response))
}

/// POST /api/classify — which categories a topic's keywords point at.
async fn classify_topic(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ClassifyBody>,
) -> Json<serde_json::Value> {
    let matcher = state.validator.matcher();
    let categories = matcher.match_categories(&body.topic);
    let keywords = matcher.matched_keywords(&body.topic);
    debug!("Classified {:?} as {:?}", body.topic, categories);

    Json(serde_json::json!({
        "categories": categories,
        "keywords": keywords,
    }))
}

// ---------------------------------------------------------------
// Autocomplete
// ---------------------------------------------------------------

/// GET /api/suggest?category=Exams&q=jee
async fn suggest_topics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SuggestQuery>,
) -> ApiResponse {
    let category = match parse_category(&query.category) {
        Ok(c) => c,
        Err(resp) => return resp,
    };

    let suggestions = state.suggestions.suggest(category, &query.q);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "category": category,
            "query": query.q,
            "suggestions": suggestions,
        })),
    )
}
