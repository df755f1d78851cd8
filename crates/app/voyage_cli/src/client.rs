//! HTTP client for the relay server's `POST /api/chat`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;
use voyage_core::message::Message;
use voyage_core::relay::RelayError;
use voyage_core::session::ChatRelay;

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// [`ChatRelay`] that goes through a running relay server.
///
/// From here the server is the upstream: any non-2xx answer is reported as
/// [`RelayError::Upstream`] with the server's status and error text.
pub struct HttpRelay {
    http: Client,
    chat_url: Url,
}

impl HttpRelay {
    pub fn new(server: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            http: Client::new(),
            chat_url: server.join("/api/chat")?,
        })
    }
}

#[async_trait]
impl ChatRelay for HttpRelay {
    async fn send(&self, messages: Vec<Message>) -> Result<String, RelayError> {
        let resp = self
            .http
            .post(self.chat_url.clone())
            .json(&ChatRequest {
                messages: &messages,
            })
            .send()
            .await
            .map_err(|e| RelayError::Unexpected(format!("Relay server unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<ChatResponse>()
            .await
            .map(|r| r.reply)
            .map_err(|e| RelayError::Unexpected(format!("Relay response parse error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::{Value, json};

    use super::*;

    /// Start a relay server stand-in answering every `POST /api/chat` with
    /// `status` and `body`.
    async fn spawn_server(status: StatusCode, body: Value) -> Url {
        let app = axum::Router::new().route(
            "/api/chat",
            post(move || {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind relay server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve relay server");
        });

        format!("http://{addr}").parse().expect("server url")
    }

    fn bonjour() -> Vec<Message> {
        vec![Message::user("Bonjour")]
    }

    #[tokio::test]
    async fn success_returns_reply() {
        let server = spawn_server(StatusCode::OK, json!({ "reply": "Paris est magnifique" })).await;
        let relay = HttpRelay::new(&server).unwrap();

        let reply = relay.send(bonjour()).await.expect("reply");
        assert_eq!(reply, "Paris est magnifique");
    }

    #[tokio::test]
    async fn error_status_becomes_upstream_failure() {
        let server = spawn_server(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": "Error communicating with AI service" }),
        )
        .await;
        let relay = HttpRelay::new(&server).unwrap();

        let err = relay.send(bonjour()).await.unwrap_err();
        match err {
            RelayError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "Error communicating with AI service");
            }
            other => panic!("expected upstream failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_without_error_body_keeps_status() {
        let server = spawn_server(StatusCode::BAD_GATEWAY, json!("oops")).await;
        let relay = HttpRelay::new(&server).unwrap();

        let err = relay.send(bonjour()).await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(502));
    }

    #[tokio::test]
    async fn success_without_reply_field_is_unexpected() {
        let server = spawn_server(StatusCode::OK, json!({ "answer": "?" })).await;
        let relay = HttpRelay::new(&server).unwrap();

        let err = relay.send(bonjour()).await.unwrap_err();
        assert!(matches!(err, RelayError::Unexpected(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_unexpected() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let server: Url = format!("http://{addr}").parse().unwrap();
        let relay = HttpRelay::new(&server).unwrap();

        let err = relay.send(bonjour()).await.unwrap_err();
        assert!(matches!(err, RelayError::Unexpected(_)));
        assert_eq!(err.upstream_status(), None);
    }

    #[test]
    fn chat_url_is_resolved_against_server() {
        let server: Url = "http://127.0.0.1:3100".parse().unwrap();
        let relay = HttpRelay::new(&server).unwrap();
        assert_eq!(relay.chat_url.as_str(), "http://127.0.0.1:3100/api/chat");
    }

    #[test]
    fn request_body_has_messages_field() {
        let messages = [Message::user("Bonjour")];
        let json = serde_json::to_string(&ChatRequest {
            messages: &messages,
        })
        .unwrap();
        assert_eq!(json, r#"{"messages":[{"role":"user","content":"Bonjour"}]}"#);
    }
}
