//! Piper TTS Client
//!
//! Renders a turn to a wav file by spawning the local Piper binary. The
//! text is sanitized first and fed over stdin; command-line delivery would
//! hit length and escaping limits.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::{SpeechPort, TtsError};
use crate::domain::{clean_for_speech, Voice};

/// Piper client configuration
#[derive(Debug, Clone)]
pub struct PiperTtsConfig {
    /// Piper executable; a bare name resolves through PATH
    pub executable: PathBuf,
    /// Directory holding `male.onnx` / `female.onnx`
    pub models_dir: PathBuf,
    /// Kill the process after this long; a hung engine must not block the
    /// refill loop forever
    pub timeout_secs: u64,
}

impl Default for PiperTtsConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("piper"),
            models_dir: PathBuf::from("models"),
            timeout_secs: 60,
        }
    }
}

/// Subprocess-based Piper TTS client
pub struct PiperTtsClient {
    config: PiperTtsConfig,
}

impl PiperTtsClient {
    pub fn new(config: PiperTtsConfig) -> Self {
        tracing::info!(
            executable = %config.executable.display(),
            models_dir = %config.models_dir.display(),
            "Piper TTS client initialized"
        );
        Self { config }
    }

    /// Voice model path: `<models_dir>/<voice>.onnx`
    fn model_path(&self, voice: Voice) -> PathBuf {
        self.config.models_dir.join(format!("{}.onnx", voice.as_str()))
    }
}

#[async_trait]
impl SpeechPort for PiperTtsClient {
    async fn synthesize(
        &self,
        text: &str,
        voice: Voice,
        output_path: &Path,
    ) -> Result<(), TtsError> {
        let cleaned = clean_for_speech(text);
        if cleaned.is_empty() {
            return Err(TtsError::EmptyText);
        }

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TtsError::IoError(e.to_string()))?;
        }

        tracing::debug!(
            voice = voice.as_str(),
            chars = cleaned.len(),
            output = %output_path.display(),
            "Synthesizing speech"
        );

        let mut child = Command::new(&self.config.executable)
            .arg("--model")
            .arg(self.model_path(voice))
            .arg("--output_file")
            .arg(output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| TtsError::SpawnFailed(e.to_string()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TtsError::SpawnFailed("stdin unavailable".to_string()))?;
        // the engine may exit before draining stdin; its exit status is
        // what decides success, so a broken pipe here is only logged
        if let Err(e) = stdin.write_all(cleaned.as_bytes()).await {
            tracing::debug!(error = %e, "Speech engine closed stdin early");
        }
        // close stdin so the engine sees end of input
        drop(stdin);

        let status = match tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait(),
        )
        .await
        {
            Ok(result) => result.map_err(|e| TtsError::IoError(e.to_string()))?,
            Err(_) => {
                let _ = child.start_kill();
                return Err(TtsError::Timeout(self.config.timeout_secs));
            }
        };

        if !status.success() {
            return Err(TtsError::EngineFailed(format!(
                "process exited with {status}"
            )));
        }

        Ok(())
    }
}
