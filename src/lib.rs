//! Storycast - narrated two-speaker story dialogues
//!
//! Turns seed stories into dialogue scripts via a language model, narrates
//! each turn with a local TTS engine, and serves script plus audio over
//! HTTP.
//!
//! Layers:
//! - `domain`: story types, dialogue parser, speech-text sanitizer
//! - `application`: generation pipeline, fresh-story cache, outbound ports
//! - `infrastructure`: LLM/TTS/storage adapters and the HTTP surface
//! - `config`: layered configuration

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
