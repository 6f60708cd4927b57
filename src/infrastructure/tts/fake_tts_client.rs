//! Fake TTS Client - for tests
//!
//! Writes a stub artifact instead of calling the speech engine, counting
//! invocations so tests can assert on the resumability heuristic.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::ports::{SpeechPort, TtsError};
use crate::domain::Voice;

/// Fake TTS client
pub struct FakeTtsClient {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeTtsClient {
    /// Client that writes a stub wav per call
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Client whose every call fails with an engine error
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `synthesize` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeTtsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechPort for FakeTtsClient {
    async fn synthesize(
        &self,
        _text: &str,
        voice: Voice,
        output_path: &Path,
    ) -> Result<(), TtsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(TtsError::EngineFailed("fake failure".to_string()));
        }

        tracing::debug!(
            voice = voice.as_str(),
            output = %output_path.display(),
            "FakeTtsClient: writing stub audio"
        );

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TtsError::IoError(e.to_string()))?;
        }
        tokio::fs::write(output_path, b"RIFF")
            .await
            .map_err(|e| TtsError::IoError(e.to_string()))
    }
}
