//! Provider and wire types for the text-generation API.

use bharatexplain_core::GeoLocation;
use serde::{Deserialize, Serialize};

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    Gemini,
    OpenAI,
    Anthropic,
    Groq,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Groq => write!(f, "groq"),
        }
    }
}

/// Provider, model and key resolved from configuration for one call.
#[derive(Debug, Clone)]
pub struct ProviderTarget {
    pub provider: LLMProvider,
    pub model: String,
    pub api_key: String,
}

/// Chat message sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Sampling and tool parameters for one generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// `None` leaves the provider default in place.
    pub temperature: Option<f64>,
    pub max_tokens: usize,
    /// Enables Google Maps grounding around this point (Gemini only).
    pub maps_location: Option<GeoLocation>,
}

/// A place the model grounded its answer on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

/// SSE stream event types for `/api/explain/stream`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "token")]
    Token { content: String },
    #[serde(rename = "source")]
    Source { title: String, uri: String },
    #[serde(rename = "done")]
    Done {
        model: String,
        #[serde(rename = "tokensUsed")]
        tokens_used: usize,
        duration: u64,
    },
    #[serde(rename = "error")]
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        friendly: Option<crate::friendly::FriendlyError>,
    },
}

/// LLM config response (keys masked).
#[derive(Debug, Clone, Serialize)]
pub struct LLMConfigResponse {
    #[serde(rename = "preferredProvider")]
    pub preferred_provider: String,
    #[serde(rename = "geminiConfigured")]
    pub gemini_configured: bool,
    #[serde(rename = "openaiConfigured")]
    pub openai_configured: bool,
    #[serde(rename = "anthropicConfigured")]
    pub anthropic_configured: bool,
    #[serde(rename = "groqConfigured")]
    pub groq_configured: bool,
    #[serde(rename = "geminiModel")]
    pub gemini_model: String,
    #[serde(rename = "openaiModel")]
    pub openai_model: String,
    #[serde(rename = "anthropicModel")]
    pub anthropic_model: String,
    #[serde(rename = "groqModel")]
    pub groq_model: String,
    #[serde(rename = "activeProvider")]
    pub active_provider: Option<String>,
}

/// LLM config update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LLMConfigUpdate {
    #[serde(rename = "preferredProvider")]
    pub preferred_provider: Option<String>,
    #[serde(rename = "geminiApiKey")]
    pub gemini_api_key: Option<String>,
    #[serde(rename = "openaiApiKey")]
    pub openai_api_key: Option<String>,
    #[serde(rename = "anthropicApiKey")]
    pub anthropic_api_key: Option<String>,
    #[serde(rename = "groqApiKey")]
    pub groq_api_key: Option<String>,
    #[serde(rename = "geminiModel")]
    pub gemini_model: Option<String>,
    #[serde(rename = "openaiModel")]
    pub openai_model: Option<String>,
    #[serde(rename = "anthropicModel")]
    pub anthropic_model: Option<String>,
    #[serde(rename = "groqModel")]
    pub groq_model: Option<String>,
}

/// API key test request.
#[derive(Debug, Clone, Deserialize)]
pub struct TestKeyRequest {
    pub provider: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
}
