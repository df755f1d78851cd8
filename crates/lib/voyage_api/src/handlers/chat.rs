//! Chat relay endpoint.
//!
//! The body is parsed here rather than with the `Json` extractor so that a
//! malformed payload is reported like any other unexpected failure (500)
//! instead of axum's 4xx rejection.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;
use voyage_core::message::Message;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Request body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

/// Successful response body of `POST /api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// `POST /api/chat` — forward the transcript and return the assistant reply.
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<ChatResponse>> {
    let request_id = Uuid::new_v4();
    relay_chat(&state, &body)
        .instrument(info_span!("chat", %request_id))
        .await
}

async fn relay_chat(state: &AppState, body: &[u8]) -> AppResult<Json<ChatResponse>> {
    let request: ChatRequest = serde_json::from_slice(body).map_err(|e| {
        error!("error processing request: {e}");
        AppError::MalformedRequest(e.to_string())
    })?;

    info!(messages = request.messages.len(), "chat request");

    let reply = state.relay.relay(&request.messages).await?;
    Ok(Json(ChatResponse { reply }))
}
