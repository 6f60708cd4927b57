//! Application Ports
//!
//! Abstract interfaces to the external capabilities the pipeline drives:
//! the language model and the speech engine. Concrete adapters live in the
//! infrastructure layer.

mod llm;
mod tts;

pub use llm::{CompletionRequest, LlmError, LlmPort};
pub use tts::{SpeechPort, TtsError};
