//! External LLM provider streaming implementations.
//!
//! Each provider streams tokens via SSE from their respective APIs.
//! OpenAI and Groq use the same format. Anthropic and Gemini each use their own.

use std::pin::Pin;

use futures::Stream;
use reqwest::Client;
use serde_json::json;
use tokio_stream::StreamExt;
use tracing::{debug, error};

use crate::error::ChatError;
use crate::types::{ChatMessage, GenerationParams, GroundingSource, LLMProvider, ProviderTarget};

const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Boxed stream type for returning different stream implementations.
pub type BoxedStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// A single streamed token, grounding source, or error.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Token(String),
    Source(GroundingSource),
    Done { tokens_used: usize },
    Error(String),
}

/// A fully collected generation.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub text: String,
    pub sources: Vec<GroundingSource>,
    pub tokens_used: usize,
}

/// Stream tokens from the appropriate provider.
pub fn stream_llm(
    client: &Client,
    target: &ProviderTarget,
    messages: Vec<ChatMessage>,
    params: &GenerationParams,
) -> BoxedStream {
    let model = target.model.clone();
    let api_key = target.api_key.clone();
    match target.provider {
        LLMProvider::Gemini => Box::pin(stream_gemini(
            client.clone(),
            messages,
            model,
            api_key,
            params.clone(),
        )),
        LLMProvider::OpenAI => Box::pin(stream_openai_compat(
            client.clone(),
            "https://api.openai.com/v1/chat/completions",
            messages,
            model,
            api_key,
            params.clone(),
        )),
        LLMProvider::Groq => Box::pin(stream_openai_compat(
            client.clone(),
            "https://api.groq.com/openai/v1/chat/completions",
            messages,
            model,
            api_key,
            params.clone(),
        )),
        LLMProvider::Anthropic => Box::pin(stream_anthropic(
            client.clone(),
            messages,
            model,
            api_key,
            params.clone(),
        )),
    }
}

/// Drain a provider stream into a single completion.
pub async fn collect(stream: BoxedStream) -> Result<Completion, ChatError> {
    tokio::pin!(stream);

    let mut completion = Completion::default();
    while let Some(chunk) = stream.next().await {
        match chunk {
            StreamChunk::Token(text) => completion.text.push_str(&text),
            StreamChunk::Source(source) => completion.sources.push(source),
            StreamChunk::Done { tokens_used } => {
                completion.tokens_used = tokens_used;
                break;
            }
            StreamChunk::Error(e) => return Err(ChatError::Provider(e)),
        }
    }
    Ok(completion)
}

/// Pull complete lines out of an SSE byte buffer, leaving any partial line
/// behind. Lines are decoded only once complete, so a multi-byte character
/// split across network chunks survives intact.
fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
        let raw: Vec<u8> = buffer.drain(..=line_end).collect();
        let line = String::from_utf8_lossy(&raw).trim().to_string();
        if !line.is_empty() && !line.starts_with(':') {
            lines.push(line);
        }
    }
    lines
}

/// Stream from OpenAI-compatible APIs (OpenAI, Groq).
fn stream_openai_compat(
    client: Client,
    url: &str,
    messages: Vec<ChatMessage>,
    model: String,
    api_key: String,
    params: GenerationParams,
) -> impl Stream<Item = StreamChunk> + Send + 'static {
    let url = url.to_string();
    let msgs: Vec<serde_json::Value> = messages
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    async_stream::stream! {
        let mut body = json!({
            "model": model,
            "messages": msgs,
            "max_tokens": params.max_tokens,
            "stream": true,
        });
        if let Some(t) = params.temperature {
            body["temperature"] = json!(t);
        }

        debug!("Streaming from {} with model {}", url, model);

        let response = match client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            buffer.extend_from_slice(&bytes);

            for line in drain_lines(&mut buffer) {
                if let Some(data) = line.strip_prefix("data: ") {
                    if data.trim() == "[DONE]" {
                        yield StreamChunk::Done { tokens_used: token_count };
                        return;
                    }

                    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(data) {
                        if let Some(content) = parsed["choices"][0]["delta"]["content"].as_str() {
                            if !content.is_empty() {
                                token_count += 1;
                                yield StreamChunk::Token(content.to_string());
                            }
                        }
                    }
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    }
}

/// Stream from Anthropic's Messages API.
fn stream_anthropic(
    client: Client,
    messages: Vec<ChatMessage>,
    model: String,
    api_key: String,
    params: GenerationParams,
) -> impl Stream<Item = StreamChunk> + Send + 'static {
    // Separate system message from conversation
    let system_msg: Option<String> = messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| m.content.clone());

    let conv_msgs: Vec<serde_json::Value> = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    async_stream::stream! {
        let mut body = json!({
            "model": model,
            "messages": conv_msgs,
            "max_tokens": params.max_tokens,
            "stream": true,
        });
        if let Some(t) = params.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(sys) = system_msg {
            body["system"] = json!(sys);
        }

        debug!("Streaming from Anthropic with model {}", model);

        let response = match client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            buffer.extend_from_slice(&bytes);

            for line in drain_lines(&mut buffer) {
                // Anthropic uses "event: " lines followed by "data: " lines
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                let Ok(parsed) = serde_json::from_str::<serde_json::Value>(data) else {
                    continue;
                };
                match parsed["type"].as_str() {
                    Some("content_block_delta") => {
                        if let Some(text) = parsed["delta"]["text"].as_str() {
                            if !text.is_empty() {
                                token_count += 1;
                                yield StreamChunk::Token(text.to_string());
                            }
                        }
                    }
                    Some("message_stop") => {
                        yield StreamChunk::Done { tokens_used: token_count };
                        return;
                    }
                    Some("error") => {
                        let msg = parsed["error"]["message"]
                            .as_str()
                            .unwrap_or("Unknown error");
                        error!("Anthropic error: {}", msg);
                        yield StreamChunk::Error(msg.to_string());
                        return;
                    }
                    _ => {}
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    }
}

/// Request body for Gemini's `generateContent` family.
fn gemini_body(messages: &[ChatMessage], params: &GenerationParams) -> serde_json::Value {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == "system")
        .map(|m| m.content.as_str())
        .collect();

    let contents: Vec<serde_json::Value> = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| {
            let role = if m.role == "assistant" { "model" } else { "user" };
            json!({"role": role, "parts": [{"text": m.content}]})
        })
        .collect();

    let mut generation_config = json!({ "maxOutputTokens": params.max_tokens });
    if let Some(t) = params.temperature {
        generation_config["temperature"] = json!(t);
    }

    let mut body = json!({
        "contents": contents,
        "generationConfig": generation_config,
    });
    if !system.is_empty() {
        body["systemInstruction"] = json!({"parts": [{"text": system.join("\n\n")}]});
    }
    if let Some(loc) = params.maps_location {
        body["tools"] = json!([{"googleMaps": {}}]);
        body["toolConfig"] = json!({
            "retrievalConfig": {
                "latLng": {"latitude": loc.lat, "longitude": loc.lng}
            }
        });
    }
    body
}

/// Text parts and map sources carried by one Gemini response chunk.
fn parse_gemini_chunk(parsed: &serde_json::Value) -> (Vec<String>, Vec<GroundingSource>) {
    let candidate = &parsed["candidates"][0];

    let texts = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let sources = candidate["groundingMetadata"]["groundingChunks"]
        .as_array()
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|c| {
                    let maps = &c["maps"];
                    match (maps["title"].as_str(), maps["uri"].as_str()) {
                        (Some(title), Some(uri)) if !title.is_empty() && !uri.is_empty() => {
                            Some(GroundingSource {
                                title: title.to_string(),
                                uri: uri.to_string(),
                            })
                        }
                        _ => None,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    (texts, sources)
}

/// Stream from Gemini's `streamGenerateContent` endpoint (SSE mode).
fn stream_gemini(
    client: Client,
    messages: Vec<ChatMessage>,
    model: String,
    api_key: String,
    params: GenerationParams,
) -> impl Stream<Item = StreamChunk> + Send + 'static {
    let body = gemini_body(&messages, &params);
    let url = format!("{}/models/{}:streamGenerateContent?alt=sse", GEMINI_BASE, model);

    async_stream::stream! {
        debug!("Streaming from Gemini with model {}", model);

        let response = match client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                yield StreamChunk::Error(format!("Request failed: {}", e));
                return;
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            yield StreamChunk::Error(format!("API error {}: {}", status, body));
            return;
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut token_count = 0usize;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    yield StreamChunk::Error(format!("Stream read error: {}", e));
                    return;
                }
            };

            buffer.extend_from_slice(&bytes);

            for line in drain_lines(&mut buffer) {
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                let Ok(parsed) = serde_json::from_str::<serde_json::Value>(data) else {
                    continue;
                };

                if let Some(msg) = parsed["error"]["message"].as_str() {
                    error!("Gemini error: {}", msg);
                    yield StreamChunk::Error(msg.to_string());
                    return;
                }

                if let Some(reason) = parsed["promptFeedback"]["blockReason"].as_str() {
                    yield StreamChunk::Error(format!("Prompt blocked: {}", reason));
                    return;
                }

                let (texts, sources) = parse_gemini_chunk(&parsed);
                for text in texts {
                    token_count += 1;
                    yield StreamChunk::Token(text);
                }
                for source in sources {
                    yield StreamChunk::Source(source);
                }
            }
        }

        yield StreamChunk::Done { tokens_used: token_count };
    }
}

/// Test an API key by making a minimal request.
pub async fn test_api_key(provider: &str, api_key: &str) -> Result<(), String> {
    let client = Client::new();

    let resp = match provider {
        "gemini" => client
            .get(format!("{}/models", GEMINI_BASE))
            .header("x-goog-api-key", api_key)
            .send()
            .await
            .map_err(|e| e.to_string())?,
        "openai" => client
            .get("https://api.openai.com/v1/models")
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
            .map_err(|e| e.to_string())?,
        "anthropic" => {
            let resp = client
                .post("https://api.anthropic.com/v1/messages")
                .header("x-api-key", api_key)
                .header("anthropic-version", "2023-06-01")
                .header("Content-Type", "application/json")
                .json(&json!({
                    "model": "claude-3-5-haiku-20241022",
                    "max_tokens": 1,
                    "messages": [{"role": "user", "content": "Hi"}],
                }))
                .send()
                .await
                .map_err(|e| e.to_string())?;
            // 400 with valid key means key works (may be quota/model issue)
            if resp.status().as_u16() == 400 {
                return Ok(());
            }
            resp
        }
        "groq" => client
            .get("https://api.groq.com/openai/v1/models")
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
            .map_err(|e| e.to_string())?,
        _ => return Err(format!("Unknown provider: {}", provider)),
    };

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(format!("API returned status {}", resp.status()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bharatexplain_core::GeoLocation;
    use futures::stream;

    #[test]
    fn test_drain_lines_keeps_partial_line() {
        let mut buffer = b"data: one\n: keep-alive\n\ndata: tw".to_vec();
        assert_eq!(drain_lines(&mut buffer), vec!["data: one".to_string()]);
        assert_eq!(buffer, b"data: tw");
    }

    #[test]
    fn test_drain_lines_joins_split_character() {
        let line = "data: हिंदी\n".as_bytes();
        // Cut inside the first Devanagari character (3 bytes each).
        let cut = "data: ".len() + 2;

        let mut buffer = line[..cut].to_vec();
        assert!(drain_lines(&mut buffer).is_empty());

        buffer.extend_from_slice(&line[cut..]);
        assert_eq!(drain_lines(&mut buffer), vec!["data: हिंदी".to_string()]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_gemini_body_maps_roles_and_tools() {
        let messages = vec![
            ChatMessage::system("be nice"),
            ChatMessage::user("hi"),
            ChatMessage {
                role: "assistant".into(),
                content: "hello".into(),
            },
        ];
        let params = GenerationParams {
            temperature: Some(0.7),
            max_tokens: 100,
            maps_location: Some(GeoLocation { lat: 28.6, lng: 77.2 }),
        };
        let body = gemini_body(&messages, &params);

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be nice");
        assert_eq!(body["contents"].as_array().unwrap().len(), 2);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert!(body["tools"][0]["googleMaps"].is_object());
        assert_eq!(body["toolConfig"]["retrievalConfig"]["latLng"]["latitude"], 28.6);
    }

    #[test]
    fn test_gemini_body_without_location_has_no_tools() {
        let body = gemini_body(&[ChatMessage::user("hi")], &GenerationParams::default());
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn test_parse_gemini_chunk() {
        let parsed = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Visit "}, {"text": "Goa"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"maps": {"title": "Baga Beach", "uri": "https://maps.google.com/?cid=1"}},
                    {"web": {"title": "ignored", "uri": "https://example.com"}},
                    {"maps": {"title": "", "uri": "https://maps.google.com/?cid=2"}}
                ]}
            }]
        });
        let (texts, sources) = parse_gemini_chunk(&parsed);
        assert_eq!(texts, vec!["Visit ", "Goa"]);
        assert_eq!(
            sources,
            vec![GroundingSource {
                title: "Baga Beach".into(),
                uri: "https://maps.google.com/?cid=1".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_collect_joins_tokens() {
        let chunks = vec![
            StreamChunk::Token("Namaste ".into()),
            StreamChunk::Source(GroundingSource {
                title: "Red Fort".into(),
                uri: "https://maps.google.com/?cid=3".into(),
            }),
            StreamChunk::Token("Bharat".into()),
            StreamChunk::Done { tokens_used: 2 },
        ];
        let completion = collect(Box::pin(stream::iter(chunks))).await.unwrap();
        assert_eq!(completion.text, "Namaste Bharat");
        assert_eq!(completion.sources.len(), 1);
        assert_eq!(completion.tokens_used, 2);
    }

    #[tokio::test]
    async fn test_collect_surfaces_errors() {
        let chunks = vec![
            StreamChunk::Token("partial".into()),
            StreamChunk::Error("API error 429: quota".into()),
        ];
        let err = collect(Box::pin(stream::iter(chunks))).await.unwrap_err();
        assert_eq!(err, ChatError::Provider("API error 429: quota".into()));
    }
}
