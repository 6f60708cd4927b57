//! HTTP Routes
//!
//! - `GET /story`                        next ready story, audio URLs resolved
//! - `GET /stories/<id>/<n>.wav`         static audio artifact for turn `n`
//! - `GET /ping`                         health check

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use super::handlers;
use super::state::AppState;

/// Create all routes; generated audio is served straight off disk
pub fn create_routes(generated_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route("/story", get(handlers::get_story))
        .route("/ping", get(handlers::ping))
        .nest_service("/stories", ServeDir::new(generated_dir))
}
