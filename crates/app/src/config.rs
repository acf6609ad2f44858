//! Configuration

use std::{path::PathBuf, time::Duration};

use clap::Args;
use shopfront::history::DEFAULT_HISTORY_DEPTH;

/// Hosted backend settings.
#[derive(Debug, Clone, Args)]
pub struct BackendConfig {
    /// Base URL of the hosted database/auth service
    #[arg(long, env = "SHOPFRONT_BACKEND_URL")]
    pub backend_url: String,

    /// Public API key sent with every backend request
    #[arg(long, env = "SHOPFRONT_BACKEND_API_KEY", hide_env_values = true)]
    pub backend_api_key: String,
}

impl BackendConfig {
    /// Backend URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.backend_url.trim_end_matches('/').to_string()
    }
}

/// Ledger and sync settings.
#[derive(Debug, Clone, Args)]
pub struct SyncConfig {
    /// Quiet period before local changes are written to the backend
    #[arg(long, env = "SHOPFRONT_SYNC_DEBOUNCE_MS", default_value_t = 500_u64)]
    pub sync_debounce_ms: u64,

    /// Number of cart replacements that can be undone
    #[arg(long, env = "SHOPFRONT_HISTORY_DEPTH", default_value_t = DEFAULT_HISTORY_DEPTH)]
    pub history_depth: usize,
}

impl SyncConfig {
    /// Debounce window as a duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.sync_debounce_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            sync_debounce_ms: 500,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

/// Catalog source settings.
#[derive(Debug, Clone, Args)]
pub struct CatalogConfig {
    /// Path to the YAML product catalog
    #[arg(long, env = "SHOPFRONT_CATALOG", default_value = "./fixtures/catalog/storefront.yml")]
    pub catalog: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
