//! Integration tests — build the router, call `/api/chat` against a fake
//! completion service listening on an ephemeral port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceExt;
use voyage_api::AppState;
use voyage_api::config::ApiConfig;
use voyage_core::message::SYSTEM_INSTRUCTION;
use voyage_core::relay::RelayConfig;

/// What the fake completion service saw on its last call.
#[derive(Debug, Clone)]
struct Seen {
    deployment: String,
    api_version: Option<String>,
    api_key: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct FakeUpstream {
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Option<Seen>>>,
    status: StatusCode,
    body: &'static str,
}

impl FakeUpstream {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Seen {
        self.seen.lock().unwrap().clone().expect("upstream was called")
    }
}

async fn completions(
    State(upstream): State<FakeUpstream>,
    Path(deployment): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    upstream.calls.fetch_add(1, Ordering::SeqCst);
    *upstream.seen.lock().unwrap() = Some(Seen {
        deployment,
        api_version: query.get("api-version").cloned(),
        api_key: headers
            .get("api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (
        upstream.status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.body,
    )
}

/// Start a fake completion service answering every call with `status`/`body`.
async fn spawn_upstream(status: StatusCode, body: &'static str) -> (String, FakeUpstream) {
    let upstream = FakeUpstream {
        calls: Arc::new(AtomicUsize::new(0)),
        seen: Arc::new(Mutex::new(None)),
        status,
        body,
    };

    let app = Router::new()
        .route(
            "/openai/deployments/{deployment}/chat/completions",
            post(completions),
        )
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake upstream");
    });

    (format!("http://{addr}"), upstream)
}

fn app(relay: RelayConfig) -> Router {
    voyage_api::router(AppState::new(ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        relay,
    }))
}

async fn post_chat(app: Router, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("parse JSON");
    (status, json)
}

const BONJOUR: &str = r#"{"messages":[{"role":"user","content":"Bonjour"}]}"#;

#[tokio::test]
async fn relays_reply_from_first_choice() {
    let (endpoint, upstream) = spawn_upstream(
        StatusCode::OK,
        r#"{"choices":[{"message":{"content":"Paris est magnifique"}}]}"#,
    )
    .await;

    let (status, json) = post_chat(app(RelayConfig::new(endpoint, "test-key", "gpt-test")), BONJOUR).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "reply": "Paris est magnifique" }));

    assert_eq!(upstream.calls(), 1);
    let seen = upstream.seen();
    assert_eq!(seen.deployment, "gpt-test");
    assert_eq!(seen.api_version.as_deref(), Some("2023-05-15"));
    assert_eq!(seen.api_key.as_deref(), Some("test-key"));
    assert_eq!(seen.body["max_tokens"], 800);
    assert_eq!(seen.body["temperature"], 0.7);

    let messages = seen.body["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], json!({ "role": "system", "content": SYSTEM_INSTRUCTION }));
    assert_eq!(messages[1], json!({ "role": "user", "content": "Bonjour" }));
}

#[tokio::test]
async fn existing_system_message_is_forwarded_as_is() {
    let (endpoint, upstream) = spawn_upstream(
        StatusCode::OK,
        r#"{"choices":[{"message":{"content":"ok"}}]}"#,
    )
    .await;
    let body = r#"{"messages":[{"role":"user","content":"Hi"},{"role":"system","content":"Answer in English."}]}"#;

    let (status, _) = post_chat(app(RelayConfig::new(endpoint, "k", "d")), body).await;

    assert_eq!(status, StatusCode::OK);
    let messages = upstream.seen().body["messages"].clone();
    assert_eq!(
        messages,
        json!([
            { "role": "user", "content": "Hi" },
            { "role": "system", "content": "Answer in English." }
        ])
    );
}

#[tokio::test]
async fn upstream_failure_passes_status_through() {
    let (endpoint, upstream) = spawn_upstream(StatusCode::TOO_MANY_REQUESTS, "rate limited").await;

    let (status, json) = post_chat(app(RelayConfig::new(endpoint, "k", "d")), BONJOUR).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json, json!({ "error": "Error communicating with AI service" }));
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn missing_configuration_fails_without_calling_upstream() {
    let (endpoint, upstream) = spawn_upstream(StatusCode::OK, "{}").await;
    let configs = [
        RelayConfig {
            endpoint: None,
            ..RelayConfig::new(endpoint.clone(), "k", "d")
        },
        RelayConfig {
            api_key: None,
            ..RelayConfig::new(endpoint.clone(), "k", "d")
        },
        RelayConfig {
            deployment: None,
            ..RelayConfig::new(endpoint.clone(), "k", "d")
        },
        RelayConfig::default(),
    ];

    for config in configs {
        let (status, json) = post_chat(app(config), BONJOUR).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "error": "Service configuration error" }));
    }
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn malformed_payload_is_unexpected_error() {
    let (endpoint, upstream) = spawn_upstream(StatusCode::OK, "{}").await;

    for body in [
        "not json",
        r#"{"msgs":[]}"#,
        r#"{"messages":[{"role":"robot","content":"x"}]}"#,
    ] {
        let (status, json) = post_chat(app(RelayConfig::new(endpoint.clone(), "k", "d")), body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, json!({ "error": "An unexpected error occurred" }));
    }
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn zero_choices_is_bad_gateway() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, r#"{"choices":[]}"#).await;

    let (status, json) = post_chat(app(RelayConfig::new(endpoint, "k", "d")), BONJOUR).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json, json!({ "error": "AI service returned no completion" }));
}

#[tokio::test]
async fn unparseable_upstream_body_is_unexpected_error() {
    let (endpoint, _upstream) = spawn_upstream(StatusCode::OK, "<html>").await;

    let (status, json) = post_chat(app(RelayConfig::new(endpoint, "k", "d")), BONJOUR).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "An unexpected error occurred" }));
}

#[tokio::test]
async fn health_reports_relay_configuration() {
    let req = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let resp = app(RelayConfig::default()).oneshot(req).await.expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json: Value = serde_json::from_slice(&body).expect("parse JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["relayConfigured"], false);
    assert!(json["version"].is_string());
}
