//! Application configuration
//!
//! Values come from `MUNDO_*` environment variables (a `.env` file is loaded
//! first by `main`), falling back to the defaults below.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Which document/character store adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

/// Application configuration loaded from environment
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Ollama API base URL (OpenAI-compatible)
    pub ollama_base_url: String,
    /// Default model for LLM requests
    pub ollama_model: String,
    /// Upper bound for a single AI call, in seconds
    pub ai_timeout_secs: u64,

    pub store_backend: StoreBackend,
    /// SQLite connection string
    pub database_url: String,
    /// Comma-separated collections that reject writes
    pub read_only_collections: String,

    /// Chat turns sent to the game master, newest last
    pub chat_history_limit: usize,

    /// HTTP server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        config::Config::builder()
            .set_default("ollama_base_url", "http://localhost:11434")?
            .set_default("ollama_model", "llama3.2")?
            .set_default("ai_timeout_secs", 60_i64)?
            .set_default("store_backend", "sqlite")?
            .set_default("database_url", "sqlite://mundo_mitico.db?mode=rwc")?
            .set_default("read_only_collections", "")?
            .set_default("chat_history_limit", 20_i64)?
            .set_default("server_port", 3000_i64)?
            .add_source(config::Environment::with_prefix("MUNDO").try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    pub fn read_only_collections(&self) -> Vec<String> {
        self.read_only_collections
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
