//! LLM Port
//!
//! Outbound port for the language-model capability: stream a chat
//! completion for a system+user prompt pair and hand back the
//! concatenated text.

use async_trait::async_trait;
use thiserror::Error;

/// LLM errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out")]
    Timeout,
}

/// Completion request
///
/// Every supported option is enumerated here with an explicit default;
/// there is no pass-through of untyped provider options.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Provider model id
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            model: "deepseek-ai/deepseek-v3.1".to_string(),
            system_prompt: String::new(),
            user_prompt: String::new(),
            temperature: 0.7,
            top_p: 0.7,
            max_tokens: 8192,
        }
    }
}

impl CompletionRequest {
    pub fn with_prompts(
        mut self,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        self.system_prompt = system_prompt.into();
        self.user_prompt = user_prompt.into();
        self
    }
}

/// Language Model Port
#[async_trait]
pub trait LlmPort: Send + Sync {
    /// Stream a completion and return the full concatenated text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
