//! LLM Adapters - implementations of the LLM port

mod fake_llm_client;
mod openai_client;

pub use fake_llm_client::FakeLlmClient;
pub use openai_client::{OpenAiLlmClient, OpenAiLlmConfig};
