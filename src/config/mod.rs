//! Configuration management for TipPool
//!
//! Loads from YAML files + environment variables via .env

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub draws: DrawsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP API binds to
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrawsConfig {
    /// Base URL of the Svenska Spel API
    pub base_url: String,
    /// How often the current-draw cache refreshes, in seconds
    pub refresh_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Server defaults
            .set_default("server.port", 8080)?
            // Draw feed defaults
            .set_default("draws.base_url", "https://api.spela.svenskaspel.se")?
            .set_default("draws.refresh_secs", 60)?
            .set_default("draws.request_timeout_secs", 10)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (TIPPOOL_*)
            .add_source(Environment::with_prefix("TIPPOOL").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// One-line summary for startup logging
    pub fn digest(&self) -> String {
        format!(
            "port={} draws_base={} refresh={}s",
            self.server.port, self.draws.base_url, self.draws.refresh_secs
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_any_files() {
        let config = AppConfig::load().unwrap();
        assert!(config.server.port > 0);
        assert!(config.draws.base_url.starts_with("https://"));
        assert!(config.draws.refresh_secs > 0);
    }
}
