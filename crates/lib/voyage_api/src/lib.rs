//! # voyage_api
//!
//! HTTP API library for Voyage: the chat relay endpoint and a health check.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use voyage_core::relay::Relay;

use crate::config::ApiConfig;
use crate::handlers::{chat, health};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Relay to the completion service; owns the relay configuration.
    pub relay: Relay,
}

impl AppState {
    /// State backed by the Azure OpenAI client built from `config.relay`.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            relay: Relay::azure(config.relay),
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(routes::POST_API_CHAT, post(chat::chat_handler))
        .layer(cors)
        .with_state(state)
}
