//! Application State

use std::sync::Arc;

use crate::application::FreshStoryCache;

/// Shared HTTP state
///
/// One long-lived handle constructed at process start; handlers reach the
/// pipeline only through the fresh-story cache.
pub struct AppState {
    pub fresh_cache: Arc<FreshStoryCache>,
}

impl AppState {
    pub fn new(fresh_cache: Arc<FreshStoryCache>) -> Self {
        Self { fresh_cache }
    }
}
