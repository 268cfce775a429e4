//! High-level explanation, doubt and translation calls.

use bharatexplain_core::{DoubtItem, ExplanationRequest};
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::prompts;
use crate::providers::{self, BoxedStream};
use crate::types::{GroundingSource, ProviderTarget};

pub const TRANSLATION_FALLBACK: &str = "Translation failed.";
pub const DOUBT_FALLBACK: &str = "I couldn't generate an answer. Please try again.";

/// A generated explanation.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub content: String,
    pub model: String,
    pub tokens_used: usize,
}

/// Append a deduplicated "View on Google Maps" section for grounding sources.
pub fn append_map_links(text: &str, sources: &[GroundingSource]) -> String {
    let mut links: Vec<String> = Vec::new();
    for source in sources {
        let link = format!("- [📍 {}]({})", source.title, source.uri);
        if !links.contains(&link) {
            links.push(link);
        }
    }

    if links.is_empty() {
        return text.to_string();
    }
    format!("{}\n\n### 🗺️ View on Google Maps\n{}", text, links.join("\n"))
}

/// Sends prompts to the configured provider. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ExplainService {
    client: Client,
}

impl ExplainService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Raw token stream for an explanation, for SSE relaying.
    pub fn stream_explanation(
        &self,
        target: &ProviderTarget,
        request: &ExplanationRequest,
    ) -> BoxedStream {
        let (messages, params) = prompts::explanation(request);
        providers::stream_llm(&self.client, target, messages, &params)
    }

    pub async fn generate_explanation(
        &self,
        target: &ProviderTarget,
        request: &ExplanationRequest,
    ) -> Result<Explanation, ChatError> {
        debug!(
            "Explaining {:?} ({}, {}) via {}",
            request.topic, request.category, request.difficulty, target.provider
        );

        let completion = providers::collect(self.stream_explanation(target, request))
            .await
            .inspect_err(|e| warn!("Explanation failed: {}", e))?;

        let content = append_map_links(&completion.text, &completion.sources);
        if content.trim().is_empty() {
            return Err(ChatError::NoContent);
        }

        Ok(Explanation {
            content,
            model: target.model.clone(),
            tokens_used: completion.tokens_used,
        })
    }

    pub async fn translate_text(
        &self,
        target: &ProviderTarget,
        text: &str,
        target_language: &str,
    ) -> Result<String, ChatError> {
        let (messages, params) = prompts::translation(text, target_language);
        let stream = providers::stream_llm(&self.client, target, messages, &params);
        let completion = providers::collect(stream)
            .await
            .inspect_err(|e| warn!("Translation to {} failed: {}", target_language, e))?;

        Ok(non_empty_or(completion.text, TRANSLATION_FALLBACK))
    }

    pub async fn resolve_doubt(
        &self,
        target: &ProviderTarget,
        question: &str,
        topic: &str,
        explanation: &str,
        history: &[DoubtItem],
    ) -> Result<String, ChatError> {
        let (messages, params) = prompts::doubt(question, topic, explanation, history);
        let stream = providers::stream_llm(&self.client, target, messages, &params);
        let completion = providers::collect(stream)
            .await
            .inspect_err(|e| warn!("Doubt failed: {}", e))?;

        Ok(non_empty_or(completion.text, DOUBT_FALLBACK))
    }
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}
