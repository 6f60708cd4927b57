//! Storage - seed sources and the generated-story disk cache

mod seed_pool;
mod story_store;

pub use seed_pool::{SeedPool, SeedPoolError};
pub use story_store::{StoreError, StoryStore};
