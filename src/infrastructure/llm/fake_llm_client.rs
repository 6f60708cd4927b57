//! Fake LLM Client - canned completions for tests
//!
//! Returns a fixed response without calling any service, counting
//! invocations so tests can assert on single-flight and cache-hit
//! behavior.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{CompletionRequest, LlmError, LlmPort};

/// Fake LLM client
pub struct FakeLlmClient {
    response: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeLlmClient {
    /// Client that always succeeds with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Client that always fails with a service error
    pub fn failing() -> Self {
        Self {
            response: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Simulated streaming latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmPort for FakeLlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(model = %request.model, "FakeLlmClient: returning canned response");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.response {
            Some(response) => Ok(response.clone()),
            None => Err(LlmError::ServiceError("fake failure".to_string())),
        }
    }
}
