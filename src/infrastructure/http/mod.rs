//! HTTP Layer - routes, handlers, server

mod error;
mod handlers;
mod middleware;
mod routes;
mod server;
mod state;

pub use error::ApiError;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
