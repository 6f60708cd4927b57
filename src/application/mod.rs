//! Application Layer
//!
//! Use-case orchestration: the story generation pipeline, the fresh-story
//! cache it feeds, the scripting prompts and the outbound ports.

pub mod fresh_cache;
pub mod pipeline;
pub mod ports;
pub mod prompts;

pub use fresh_cache::{FreshCacheConfig, FreshStoryCache};
pub use pipeline::{PipelineError, StoryPipeline};
pub use ports::{CompletionRequest, LlmError, LlmPort, SpeechPort, TtsError};
