//! Configuration Types

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::ports::CompletionRequest;
use crate::application::FreshCacheConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// LLM configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model id
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Credential; also picked up from `NVIDIA_API_KEY` by the loader
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whole-request timeout covering the full token stream
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_base_url() -> String {
    "https://integrate.api.nvidia.com/v1".to_string()
}

fn default_llm_model() -> String {
    "deepseek-ai/deepseek-v3.1".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_llm_timeout() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: String::new(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    /// Completion options the pipeline uses for every request
    pub fn completion_defaults(&self) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
            ..Default::default()
        }
    }
}

/// TTS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// Piper executable; a bare name resolves through PATH
    #[serde(default = "default_tts_executable")]
    pub executable: PathBuf,

    /// Directory holding the `male.onnx` / `female.onnx` voice models
    #[serde(default = "default_tts_models_dir")]
    pub models_dir: PathBuf,

    /// Per-turn synthesis timeout
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,
}

fn default_tts_executable() -> PathBuf {
    PathBuf::from("piper")
}

fn default_tts_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_tts_timeout() -> u64 {
    60
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            executable: default_tts_executable(),
            models_dir: default_tts_models_dir(),
            timeout_secs: default_tts_timeout(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Seed story JSON files
    #[serde(default = "default_seeds_dir")]
    pub seeds_dir: PathBuf,

    /// Generated scripts and audio, one directory per story id
    #[serde(default = "default_generated_dir")]
    pub generated_dir: PathBuf,
}

fn default_seeds_dir() -> PathBuf {
    PathBuf::from("stories")
}

fn default_generated_dir() -> PathBuf {
    PathBuf::from("data/generated")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seeds_dir: default_seeds_dir(),
            generated_dir: default_generated_dir(),
        }
    }
}

/// Fresh-story cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Target look-ahead queue size
    #[serde(default = "default_target_size")]
    pub target_size: usize,

    /// Background refill interval
    #[serde(default = "default_refill_interval")]
    pub refill_interval_secs: u64,

    /// Fall back to blocking on-demand generation when the queue is empty
    #[serde(default = "default_on_demand_fallback")]
    pub on_demand_fallback: bool,
}

fn default_target_size() -> usize {
    5
}

fn default_refill_interval() -> u64 {
    5
}

fn default_on_demand_fallback() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            refill_interval_secs: default_refill_interval(),
            on_demand_fallback: default_on_demand_fallback(),
        }
    }
}

impl From<&CacheConfig> for FreshCacheConfig {
    fn from(config: &CacheConfig) -> Self {
        Self {
            target_size: config.target_size,
            refill_interval_secs: config.refill_interval_secs,
            on_demand_fallback: config.on_demand_fallback,
        }
    }
}

/// Log configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.llm.model, "deepseek-ai/deepseek-v3.1");
        assert_eq!(config.cache.target_size, 5);
        assert_eq!(config.cache.refill_interval_secs, 5);
        assert!(config.cache.on_demand_fallback);
        assert_eq!(config.storage.seeds_dir, PathBuf::from("stories"));
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:4000");
    }

    #[test]
    fn test_completion_defaults_carry_llm_options() {
        let mut llm = LlmConfig::default();
        llm.model = "other/model".to_string();
        llm.max_tokens = 1024;

        let request = llm.completion_defaults();
        assert_eq!(request.model, "other/model");
        assert_eq!(request.max_tokens, 1024);
        assert_eq!(request.temperature, 0.7);
    }

    #[test]
    fn test_cache_config_conversion() {
        let cache = CacheConfig::default();
        let fresh: FreshCacheConfig = (&cache).into();
        assert_eq!(fresh.target_size, 5);
        assert!(fresh.on_demand_fallback);
    }
}
