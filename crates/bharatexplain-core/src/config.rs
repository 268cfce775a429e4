//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::Result;

/// Default number of suggestions shown for an empty topic box.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3004;

/// Paths to BharatExplain data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// LLM configuration (`data/llm-config.json`).
    pub llm_config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        debug!("Data directory ready at {}", root.display());
        Ok(Self {
            llm_config_file: root.join("llm-config.json"),
            root,
        })
    }
}

/// Top-level BharatExplain configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Suggestions returned for a blank topic.
    pub suggestion_limit: usize,
}

impl ExplainConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let port = env_or("PORT", DEFAULT_PORT);
        let suggestion_limit = env_or("SUGGESTION_LIMIT", DEFAULT_SUGGESTION_LIMIT);

        Ok(Self {
            port,
            data_paths: DataPaths::new(data_dir)?,
            suggestion_limit,
        })
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
