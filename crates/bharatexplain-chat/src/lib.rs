//! Text generation for BharatExplain via external LLM APIs.
//!
//! Explanations, follow-up doubts and translations are single prompts sent
//! to whichever provider is configured (Gemini, OpenAI, Anthropic or Groq).
//! Failures are surfaced to the caller, never retried.

pub mod config;
pub mod error;
pub mod friendly;
pub mod prompts;
pub mod providers;
pub mod service;
pub mod types;

pub use config::LLMConfig;
pub use error::ChatError;
pub use friendly::{ErrorKind, FriendlyError};
pub use service::{Explanation, ExplainService};
pub use types::*;
