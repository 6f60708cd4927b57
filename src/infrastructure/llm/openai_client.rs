//! OpenAI-Compatible LLM Client
//!
//! Streams chat completions from an OpenAI-compatible endpoint (NVIDIA
//! integrate API by default) over SSE and concatenates the delta tokens
//! into the full response.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CompletionRequest, LlmError, LlmPort};

/// Chat completion request body (JSON)
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// One SSE chunk of a streamed completion
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Line assembler for the SSE byte stream
///
/// Network chunks split at arbitrary byte offsets, including inside a
/// multi-byte UTF-8 character. Bytes are buffered as-is and a line is only
/// decoded once its terminating newline has arrived, so a character never
/// straddles a decode boundary.
#[derive(Debug, Default)]
struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    /// Append a chunk and return the lines it completed, newline-trimmed
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.bytes.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(newline) = self.bytes.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.bytes.drain(..=newline).collect();
            lines.push(String::from_utf8_lossy(&line).trim_end().to_string());
        }
        lines
    }
}

/// OpenAI client configuration
#[derive(Debug, Clone)]
pub struct OpenAiLlmConfig {
    /// API base URL, e.g. `https://integrate.api.nvidia.com/v1`
    pub base_url: String,
    /// Bearer credential; empty means unconfigured
    pub api_key: String,
    /// Whole-request timeout, covering the full stream
    pub timeout_secs: u64,
}

impl Default for OpenAiLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://integrate.api.nvidia.com/v1".to_string(),
            api_key: String::new(),
            timeout_secs: 300,
        }
    }
}

/// Streaming chat-completions client
#[derive(Debug)]
pub struct OpenAiLlmClient {
    client: Client,
    config: OpenAiLlmConfig,
}

impl OpenAiLlmClient {
    /// Create a client; fails fast when the credential is absent
    pub fn new(config: OpenAiLlmConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmPort for OpenAiLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &request.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.user_prompt,
        });

        let body = ChatRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
            stream: true,
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %request.model,
            "Sending streaming completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else if e.is_connect() {
                    LlmError::NetworkError(format!("Cannot connect to LLM service: {e}"))
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::ServiceError(format!(
                "HTTP {status}: {error_text}"
            )));
        }

        let mut stream = response.bytes_stream();
        let mut buffer = LineBuffer::default();
        let mut full_response = String::new();

        'outer: while let Some(item) = stream.next().await {
            let bytes = item.map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

            for line in buffer.push(&bytes) {
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                if data.trim() == "[DONE]" {
                    break 'outer;
                }

                match serde_json::from_str::<StreamChunk>(data) {
                    Ok(chunk) => {
                        if let Some(token) = chunk
                            .choices
                            .first()
                            .and_then(|choice| choice.delta.content.as_deref())
                        {
                            tracing::trace!(token, "Stream token");
                            full_response.push_str(token);
                        }
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping malformed stream chunk");
                    }
                }
            }
        }

        if full_response.is_empty() {
            return Err(LlmError::InvalidResponse(
                "stream contained no content".to_string(),
            ));
        }

        tracing::info!(chars = full_response.len(), "Completion stream finished");
        Ok(full_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = OpenAiLlmClient::new(OpenAiLlmConfig::default()).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn test_completions_url_joins_cleanly() {
        let client = OpenAiLlmClient::new(OpenAiLlmConfig {
            base_url: "https://integrate.api.nvidia.com/v1/".to_string(),
            api_key: "k".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            client.completions_url(),
            "https://integrate.api.nvidia.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_stream_chunk_parses_delta_content() {
        let chunk: StreamChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"Man: hi"},"index":0}]}"#,
        )
        .unwrap();
        assert_eq!(
            chunk.choices[0].delta.content.as_deref(),
            Some("Man: hi")
        );
    }

    #[test]
    fn test_stream_chunk_tolerates_empty_delta() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).unwrap();
        assert_eq!(chunk.choices[0].delta.content, None);
    }

    #[test]
    fn test_line_buffer_holds_partial_line_until_newline() {
        let mut buffer = LineBuffer::default();
        assert!(buffer.push(b"data: {\"a\":").is_empty());
        assert_eq!(buffer.push(b"1}\ndata: "), vec!["data: {\"a\":1}"]);
        assert_eq!(buffer.push(b"[DONE]\n"), vec!["data: [DONE]"]);
    }

    #[test]
    fn test_line_buffer_reassembles_multibyte_char_split_across_chunks() {
        let payload =
            "data: {\"choices\":[{\"delta\":{\"content\":\"caf\u{e9} story\"}}]}\n".as_bytes();
        // split inside the two-byte encoding of 'é'
        let split = payload.iter().position(|&b| b == 0xC3).unwrap() + 1;

        let mut buffer = LineBuffer::default();
        assert!(buffer.push(&payload[..split]).is_empty());
        let lines = buffer.push(&payload[split..]);
        assert_eq!(lines.len(), 1);

        let chunk: StreamChunk =
            serde_json::from_str(lines[0].strip_prefix("data: ").unwrap()).unwrap();
        assert_eq!(
            chunk.choices[0].delta.content.as_deref(),
            Some("caf\u{e9} story")
        );
    }
}
