//! LLM configuration persistence and provider selection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{LLMConfigResponse, LLMConfigUpdate, LLMProvider, ProviderTarget};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

pub const GEMINI_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-pro", "gemini-2.0-flash"];
pub const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"];
pub const ANTHROPIC_MODELS: &[&str] = &[
    "claude-sonnet-4-20250514",
    "claude-3-5-sonnet-20241022",
    "claude-3-5-haiku-20241022",
];
pub const GROQ_MODELS: &[&str] = &[
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "mixtral-8x7b-32768",
    "gemma2-9b-it",
];

/// Stored LLM configuration (persisted to llm-config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            gemini_api_key: None,
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            gemini_model: default_gemini_model(),
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
            config_path: PathBuf::new(),
        }
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();

        // Env vars as fallback for API keys. `API_KEY` is the older Gemini name.
        if config.gemini_api_key.is_none() {
            config.gemini_api_key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok();
        }
        if config.openai_api_key.is_none() {
            config.openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = std::env::var("GROQ_API_KEY").ok();
        }

        config
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved LLM config to {}", self.config_path.display());
        Ok(())
    }

    /// Apply an update, merging with existing config.
    pub fn apply_update(&mut self, update: &LLMConfigUpdate) {
        if let Some(p) = &update.preferred_provider {
            self.preferred_provider = p.clone();
        }
        if let Some(k) = &update.gemini_api_key {
            self.gemini_api_key = Some(k.clone());
        }
        if let Some(k) = &update.openai_api_key {
            self.openai_api_key = Some(k.clone());
        }
        if let Some(k) = &update.anthropic_api_key {
            self.anthropic_api_key = Some(k.clone());
        }
        if let Some(k) = &update.groq_api_key {
            self.groq_api_key = Some(k.clone());
        }
        if let Some(m) = &update.gemini_model {
            self.gemini_model = m.clone();
        }
        if let Some(m) = &update.openai_model {
            self.openai_model = m.clone();
        }
        if let Some(m) = &update.anthropic_model {
            self.anthropic_model = m.clone();
        }
        if let Some(m) = &update.groq_model {
            self.groq_model = m.clone();
        }
    }

    fn target(&self, provider: LLMProvider) -> Option<ProviderTarget> {
        let (key, model) = match provider {
            LLMProvider::Gemini => (&self.gemini_api_key, &self.gemini_model),
            LLMProvider::OpenAI => (&self.openai_api_key, &self.openai_model),
            LLMProvider::Anthropic => (&self.anthropic_api_key, &self.anthropic_model),
            LLMProvider::Groq => (&self.groq_api_key, &self.groq_model),
        };
        key.as_ref()
            .filter(|k| !k.trim().is_empty())
            .map(|k| ProviderTarget {
                provider,
                model: model.clone(),
                api_key: k.clone(),
            })
    }

    /// Resolve which provider and model to use.
    pub fn resolve_provider(&self) -> Option<ProviderTarget> {
        // Explicit preference
        if self.preferred_provider != "auto" {
            return match self.preferred_provider.as_str() {
                "gemini" => self.target(LLMProvider::Gemini),
                "openai" => self.target(LLMProvider::OpenAI),
                "anthropic" => self.target(LLMProvider::Anthropic),
                "groq" => self.target(LLMProvider::Groq),
                _ => None,
            };
        }

        // Auto mode: Gemini > Anthropic > Groq > OpenAI
        [
            LLMProvider::Gemini,
            LLMProvider::Anthropic,
            LLMProvider::Groq,
            LLMProvider::OpenAI,
        ]
        .into_iter()
        .find_map(|p| self.target(p))
    }

    /// Build the public config response (no API keys exposed).
    pub fn to_response(&self) -> LLMConfigResponse {
        let resolved = self.resolve_provider();
        LLMConfigResponse {
            preferred_provider: self.preferred_provider.clone(),
            gemini_configured: self.gemini_api_key.is_some(),
            openai_configured: self.openai_api_key.is_some(),
            anthropic_configured: self.anthropic_api_key.is_some(),
            groq_configured: self.groq_api_key.is_some(),
            gemini_model: self.gemini_model.clone(),
            openai_model: self.openai_model.clone(),
            anthropic_model: self.anthropic_model.clone(),
            groq_model: self.groq_model.clone(),
            active_provider: resolved.map(|t| t.provider.to_string()),
        }
    }

    /// Get available models for the active provider.
    pub fn available_models(&self) -> Vec<String> {
        let models = match self.resolve_provider().map(|t| t.provider) {
            Some(LLMProvider::Gemini) => GEMINI_MODELS,
            Some(LLMProvider::OpenAI) => OPENAI_MODELS,
            Some(LLMProvider::Anthropic) => ANTHROPIC_MODELS,
            Some(LLMProvider::Groq) => GROQ_MODELS,
            None => &[],
        };
        models.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keys_resolves_nothing() {
        let config = LLMConfig::default();
        assert!(config.resolve_provider().is_none());
        assert!(config.available_models().is_empty());
        assert!(config.to_response().active_provider.is_none());
    }

    #[test]
    fn test_auto_prefers_gemini() {
        let config = LLMConfig {
            openai_api_key: Some("sk-o".into()),
            groq_api_key: Some("gsk".into()),
            gemini_api_key: Some("AIza".into()),
            ..LLMConfig::default()
        };
        let target = config.resolve_provider().unwrap();
        assert_eq!(target.provider, LLMProvider::Gemini);
        assert_eq!(target.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(target.api_key, "AIza");
    }

    #[test]
    fn test_auto_order_without_gemini() {
        let config = LLMConfig {
            openai_api_key: Some("sk-o".into()),
            groq_api_key: Some("gsk".into()),
            ..LLMConfig::default()
        };
        assert_eq!(config.resolve_provider().unwrap().provider, LLMProvider::Groq);
    }

    #[test]
    fn test_explicit_preference_without_key() {
        let config = LLMConfig {
            preferred_provider: "anthropic".into(),
            gemini_api_key: Some("AIza".into()),
            ..LLMConfig::default()
        };
        assert!(config.resolve_provider().is_none());
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let config = LLMConfig {
            gemini_api_key: Some("   ".into()),
            openai_api_key: Some("sk-o".into()),
            ..LLMConfig::default()
        };
        assert_eq!(config.resolve_provider().unwrap().provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_update_merges_and_response_hides_keys() {
        let mut config = LLMConfig::default();
        config.apply_update(&LLMConfigUpdate {
            preferred_provider: Some("groq".into()),
            groq_api_key: Some("gsk-secret".into()),
            groq_model: Some("llama-3.1-8b-instant".into()),
            ..LLMConfigUpdate::default()
        });

        let response = config.to_response();
        assert!(response.groq_configured);
        assert_eq!(response.active_provider.as_deref(), Some("groq"));
        assert_eq!(response.groq_model, "llama-3.1-8b-instant");
        assert_eq!(response.gemini_model, DEFAULT_GEMINI_MODEL);

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("gsk-secret"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("llm-config.json");

        let mut config = LLMConfig::load(&path);
        config.preferred_provider = "openai".into();
        config.openai_api_key = Some("sk-saved".into());
        config.openai_model = "gpt-4o".into();
        config.save().unwrap();

        let loaded = LLMConfig::load(&path);
        assert_eq!(loaded.preferred_provider, "openai");
        assert_eq!(loaded.openai_api_key.as_deref(), Some("sk-saved"));
        assert_eq!(loaded.openai_model, "gpt-4o");
        assert_eq!(loaded.config_path, path);
    }
}
