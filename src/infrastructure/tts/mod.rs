//! TTS Adapters - implementations of the speech port

mod fake_tts_client;
mod piper_client;

pub use fake_tts_client::FakeTtsClient;
pub use piper_client::{PiperTtsClient, PiperTtsConfig};
