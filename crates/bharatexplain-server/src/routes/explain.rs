//! Explanation, doubt and translation routes.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bharatexplain_chat::providers::StreamChunk;
use bharatexplain_chat::{ChatError, FriendlyError, StreamEvent};
use bharatexplain_classify::ValidationOutcome;
use bharatexplain_core::{language_label, DoubtItem, ExplanationRequest};
use futures::Stream;
use serde::Deserialize;
use tokio_stream::StreamExt;
use tracing::{info, warn};

use super::{error_response, ApiResponse};
use crate::state::AppState;

type SseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/explain", post(explain))
        .route("/explain/stream", post(stream_explain))
        .route("/doubt", post(doubt))
        .route("/translate", post(translate))
}

// ---------------------------------------------------------------
// Request types
// ---------------------------------------------------------------

#[derive(Deserialize)]
struct ExplainBody {
    #[serde(flatten)]
    request: ExplanationRequest,
    #[serde(default, rename = "skipValidation")]
    skip_validation: bool,
}

#[derive(Deserialize)]
struct DoubtBody {
    question: String,
    topic: String,
    explanation: String,
    #[serde(default)]
    history: Vec<DoubtItem>,
}

#[derive(Deserialize)]
struct TranslateBody {
    text: String,
    #[serde(rename = "targetLanguage")]
    target_language: String,
}

// ---------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------

fn provider_error(err: &ChatError) -> ApiResponse {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({
            "error": err.to_string(),
            "friendly": FriendlyError::from(err),
        })),
    )
}

fn not_configured() -> ApiResponse {
    error_response(StatusCode::SERVICE_UNAVAILABLE, ChatError::NotConfigured.to_string())
}

/// Reject blank topics and, unless skipped, confident category mismatches.
fn check_submission(state: &AppState, body: &ExplainBody) -> Result<(), ApiResponse> {
    if body.request.topic.trim().is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Topic is required"));
    }
    if body.skip_validation {
        return Ok(());
    }

    match state.validator.validate(&body.request.topic, body.request.category) {
        ValidationOutcome::Valid => Ok(()),
        ValidationOutcome::Mismatch {
            suggested_category,
            suggested_label,
            message,
        } => {
            warn!(
                "Rejected {:?} under {}: looks like {}",
                body.request.topic, body.request.category, suggested_category
            );
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "error": message,
                    "suggestedCategory": suggested_category,
                    "suggestedLabel": suggested_label,
                })),
            ))
        }
    }
}

fn sse_event(event: &StreamEvent) -> Event {
    Event::default()
        .json_data(event)
        .unwrap_or_else(|_| Event::default().data("{}"))
}

// ---------------------------------------------------------------
// Explain
// ---------------------------------------------------------------

/// POST /api/explain — validate, then generate a full explanation.
async fn explain(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExplainBody>,
) -> ApiResponse {
    let start = Instant::now();

    if let Err(resp) = check_submission(&state, &body) {
        return resp;
    }
    let Some(target) = state.resolve_target() else {
        return not_configured();
    };

    let request = body.request;
    match state.explain.generate_explanation(&target, &request).await {
        Ok(explanation) => {
            let duration = start.elapsed().as_millis() as u64;
            info!(
                "Explained {:?} ({}) in {}ms",
                request.topic, request.category, duration
            );
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "id": uuid::Uuid::new_v4().to_string(),
                    "topic": request.topic,
                    "category": request.category,
                    "difficulty": request.difficulty,
                    "content": explanation.content,
                    "model": explanation.model,
                    "tokensUsed": explanation.tokens_used,
                    "generatedAt": chrono::Utc::now().to_rfc3339(),
                    "duration": duration,
                })),
            )
        }
        Err(e) => provider_error(&e),
    }
}

/// POST /api/explain/stream — same checks, tokens relayed as SSE.
async fn stream_explain(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExplainBody>,
) -> Response {
    let start = Instant::now();

    if let Err(resp) = check_submission(&state, &body) {
        return resp.into_response();
    }
    let Some(target) = state.resolve_target() else {
        return not_configured().into_response();
    };

    let llm_stream = state.explain.stream_explanation(&target, &body.request);
    let model = target.model;

    let sse_stream: SseStream = Box::pin(async_stream::stream! {
        tokio::pin!(llm_stream);
        while let Some(chunk) = llm_stream.next().await {
            match chunk {
                StreamChunk::Token(content) => {
                    yield Ok::<_, Infallible>(sse_event(&StreamEvent::Token { content }));
                }
                StreamChunk::Source(source) => {
                    yield Ok(sse_event(&StreamEvent::Source {
                        title: source.title,
                        uri: source.uri,
                    }));
                }
                StreamChunk::Done { tokens_used } => {
                    let duration = start.elapsed().as_millis() as u64;
                    yield Ok(sse_event(&StreamEvent::Done {
                        model: model.clone(),
                        tokens_used,
                        duration,
                    }));
                    // Final [DONE] marker
                    yield Ok(Event::default().data("[DONE]"));
                    return;
                }
                StreamChunk::Error(error) => {
                    let friendly = Some(FriendlyError::classify(&error));
                    yield Ok(sse_event(&StreamEvent::Error { error, friendly }));
                    return;
                }
            }
        }
    });

    Sse::new(sse_stream).into_response()
}

// ---------------------------------------------------------------
// Doubts
// ---------------------------------------------------------------

/// POST /api/doubt — answer a follow-up question about an explanation.
async fn doubt(State(state): State<Arc<AppState>>, Json(body): Json<DoubtBody>) -> ApiResponse {
    if body.question.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Question is required");
    }
    if body.explanation.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Ask for an explanation first");
    }
    let Some(target) = state.resolve_target() else {
        return not_configured();
    };

    match state
        .explain
        .resolve_doubt(&target, &body.question, &body.topic, &body.explanation, &body.history)
        .await
    {
        Ok(answer) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "question": body.question,
                "answer": answer,
            })),
        ),
        Err(e) => provider_error(&e),
    }
}

// ---------------------------------------------------------------
// Translation
// ---------------------------------------------------------------

/// POST /api/translate — translate Markdown into a supported language.
async fn translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateBody>,
) -> ApiResponse {
    if body.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Nothing to translate");
    }
    let Some(target) = state.resolve_target() else {
        return not_configured();
    };

    match state
        .explain
        .translate_text(&target, &body.text, &body.target_language)
        .await
    {
        Ok(text) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "text": text,
                "language": body.target_language,
                "languageLabel": language_label(&body.target_language),
            })),
        ),
        Err(e) => provider_error(&e),
    }
}
