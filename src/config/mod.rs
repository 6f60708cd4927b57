//! Configuration Module
//!
//! Layered configuration: environment variables over an optional TOML file
//! over defaults.

mod loader;
mod types;

pub use loader::{load_config, load_config_from_path, print_config, ConfigError};
pub use types::{
    AppConfig, CacheConfig, LlmConfig, LogConfig, ServerConfig, StorageConfig, TtsConfig,
};
