//! Shared application state.

use bharatexplain_chat::{ExplainService, LLMConfig, ProviderTarget};
use bharatexplain_classify::{SuggestionIndex, Validator};
use bharatexplain_core::ExplainConfig;
use parking_lot::RwLock;

/// Shared application state accessible from all route handlers.
///
/// The validator and suggestion index are immutable; only the LLM config
/// changes at runtime.
pub struct AppState {
    pub config: ExplainConfig,
    pub validator: Validator,
    pub suggestions: SuggestionIndex,
    pub llm_config: RwLock<LLMConfig>,
    pub explain: ExplainService,
}

impl AppState {
    pub fn new(config: ExplainConfig) -> Self {
        let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
        Self::with_llm_config(config, llm_config)
    }

    /// Build state with an explicit LLM config (skips disk and env lookup).
    pub fn with_llm_config(config: ExplainConfig, llm_config: LLMConfig) -> Self {
        let suggestions = SuggestionIndex::from_config(&config);

        Self {
            config,
            validator: Validator::builtin(),
            suggestions,
            llm_config: RwLock::new(llm_config),
            explain: ExplainService::default(),
        }
    }

    /// Provider for the next call. The lock is released before returning.
    pub fn resolve_target(&self) -> Option<ProviderTarget> {
        self.llm_config.read().resolve_provider()
    }
}
