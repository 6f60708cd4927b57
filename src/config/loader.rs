//! Configuration Loader
//!
//! Merge order, highest priority first:
//! 1. Environment variables (`STORYCAST_` prefix, `__` separator)
//! 2. Configuration file (`config.toml` / `config.local.toml`)
//! 3. Defaults

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// Config file search names, in order
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// Load the application configuration
///
/// # Environment examples
/// - `STORYCAST_SERVER__PORT=8080`
/// - `STORYCAST_LLM__API_KEY=nvapi-...` (or plain `NVIDIA_API_KEY`)
/// - `STORYCAST_TTS__EXECUTABLE=/opt/piper/piper`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// Load configuration from an explicit file path
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("STORYCAST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {e}")))?;

    // plain provider variable as a fallback credential source
    if app_config.llm.api_key.is_empty() {
        if let Ok(key) = std::env::var("NVIDIA_API_KEY") {
            app_config.llm.api_key = key;
        }
    }

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration invariants
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.llm.model.is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM model cannot be empty".to_string(),
        ));
    }

    if config.cache.target_size == 0 {
        return Err(ConfigError::ValidationError(
            "Cache target size cannot be 0".to_string(),
        ));
    }

    if config.cache.refill_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Cache refill interval cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// Log the effective configuration at startup
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("LLM: {} @ {}", config.llm.model, config.llm.base_url);
    tracing::info!(
        "LLM credential: {}",
        if config.llm.api_key.is_empty() {
            "MISSING"
        } else {
            "configured"
        }
    );
    tracing::info!("TTS executable: {}", config.tts.executable.display());
    tracing::info!("TTS models: {}", config.tts.models_dir.display());
    tracing::info!("Seeds: {}", config.storage.seeds_dir.display());
    tracing::info!("Generated: {}", config.storage.generated_dir.display());
    tracing::info!(
        "Cache: target {} / refill every {}s / on-demand fallback {}",
        config.cache.target_size,
        config.cache.refill_interval_secs,
        config.cache.on_demand_fallback
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
