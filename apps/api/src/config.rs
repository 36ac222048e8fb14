use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::models::prompt::Language;

/// Application configuration loaded from environment variables.
/// Every variable is optional; the AI features stay off without an API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: Option<String>,
    /// Replacement framework catalog. The embedded one is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub default_language: Language,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite://promptkit.db"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            catalog_path: optional_env("CATALOG_PATH").map(PathBuf::from),
            default_language: env_or("DEFAULT_LANGUAGE", "en")
                .parse::<Language>()
                .map_err(|e| anyhow!("DEFAULT_LANGUAGE must be 'en' or 'es': {e}"))?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
