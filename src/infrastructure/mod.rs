//! Infrastructure Layer
//!
//! Concrete implementations of the application ports plus the HTTP
//! surface:
//! - LLM: OpenAI-compatible streaming client (and a fake for tests)
//! - TTS: Piper subprocess client (and a fake for tests)
//! - Storage: seed pool and on-disk story cache
//! - HTTP: axum server, routes, static audio

pub mod http;
pub mod llm;
pub mod storage;
pub mod tts;
