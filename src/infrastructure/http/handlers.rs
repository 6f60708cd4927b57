//! HTTP Handlers

use axum::{
    extract::{Host, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::domain::GeneratedStory;

use super::error::ApiError;
use super::state::AppState;

/// `GET /story` response body
#[derive(Debug, Serialize)]
pub struct StoryResponse {
    pub story: GeneratedStory,
}

/// Health check
pub async fn ping() -> &'static str {
    "pong"
}

/// `GET /story` - pop the oldest ready story
///
/// Audio URLs are resolved here from the request's own scheme and host plus
/// the story id and turn index, never from a stored path.
pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    headers: HeaderMap,
) -> Result<Json<StoryResponse>, ApiError> {
    let story = state.fresh_cache.serve().await?;

    let Some(story) = story else {
        return Err(ApiError::ServiceUnavailable(
            "No stories available yet. Please try again in a moment.".to_string(),
        ));
    };

    let base_url = format!("{}://{}", request_scheme(&headers), host);
    Ok(Json(StoryResponse {
        story: story.with_audio_urls(&base_url),
    }))
}

/// Request scheme, honoring a reverse proxy's `X-Forwarded-Proto`
fn request_scheme(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("http")
}
