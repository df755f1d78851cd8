//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::debug;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether endpoint, key and deployment are all set.
    pub relay_configured: bool,
}

/// `GET /api/health` — reports version and whether the relay can be used.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let missing = state.relay.config().missing();
    if !missing.is_empty() {
        debug!(?missing, "relay is not configured");
    }

    Json(HealthResponse {
        status: "ok",
        version: voyage_core::version(),
        relay_configured: missing.is_empty(),
    })
}
