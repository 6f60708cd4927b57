//! Speech Port
//!
//! Outbound port for the speech-synthesis capability: render one turn's
//! text to a single-channel audio file for a given voice.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Voice;

/// Speech synthesis errors
#[derive(Debug, Error)]
pub enum TtsError {
    /// Text was empty after sanitizing; no external call was made
    #[error("Nothing to synthesize: text is empty after cleaning")]
    EmptyText,

    #[error("Failed to spawn speech engine: {0}")]
    SpawnFailed(String),

    #[error("Speech engine failed: {0}")]
    EngineFailed(String),

    #[error("Speech synthesis timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Speech Synthesizer Port
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// Render `text` to an audio file at `output_path` using `voice`
    ///
    /// Implementations sanitize the text first and fail with
    /// [`TtsError::EmptyText`] when nothing speakable remains. On failure
    /// no partial output file may be treated as valid by callers.
    async fn synthesize(&self, text: &str, voice: Voice, output_path: &Path)
        -> Result<(), TtsError>;
}
