//! API endpoint integration tests
//!
//! Route-handler behavior with a mock provider upstream: happy paths,
//! validation failures and error sanitization.

use crate::helpers::*;
use crate::mock_openrouter::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// The health endpoint reports status and version.
#[tokio::test]
async fn test_health_endpoint() {
    init_tracing();
    let app = test_router("http://127.0.0.1:9");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

/// A valid buffered chat request returns the gateway result as JSON.
#[tokio::test]
async fn test_chat_happy_path() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_chat_completion("A kingfisher, most likely.", 1)
        .await;

    let app = test_router(&mock.url());
    let response = app
        .oneshot(post_json(
            "/api/ai/chat",
            json!({
                "system": "You are a field guide.",
                "user": "Small blue bird diving into the river?"
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["content"], "A kingfisher, most likely.");
    assert_eq!(body["raw"]["id"], "gen-test-123");
}

/// The message-history form is accepted by the buffered endpoint.
#[tokio::test]
async fn test_chat_accepts_message_history() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_chat_completion("Likely a curlew.", 1).await;

    let app = test_router(&mock.url());
    let response = app
        .oneshot(post_json(
            "/api/ai/chat",
            json!({
                "user": [
                    {"role": "user", "content": "Long curved beak, mottled brown?"},
                    {"role": "assistant", "content": "Coastal or inland?"},
                    {"role": "user", "content": "Coastal mudflats."}
                ]
            }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

/// Requests with out-of-range parameters fail validation before any
/// upstream call.
#[tokio::test]
async fn test_chat_invalid_params_rejected() {
    init_tracing();
    let app = test_router("http://127.0.0.1:9");

    let response = app
        .oneshot(post_json(
            "/api/ai/chat",
            json!({"user": "hi", "params": {"temperature": 9.0}}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ValidationError");
}

/// Upstream provider failures reach the end user sanitized.
#[tokio::test]
async fn test_chat_provider_failure_sanitized() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_error(500, None, 1).await;

    let app = test_router(&mock.url());
    let response = app
        .oneshot(post_json("/api/ai/chat", json!({"user": "hi"})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ProviderError");
    // Internal detail stays internal.
    assert_eq!(body["error"]["message"], "AI provider error");
}

/// Upstream 404 maps through as ModelNotFound.
#[tokio::test]
async fn test_chat_model_not_found_passthrough() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_error(404, None, 1).await;

    let app = test_router(&mock.url());
    let response = app
        .oneshot(post_json(
            "/api/ai/chat",
            json!({"user": "hi", "model": "no/such-model"}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ModelNotFound");
}

/// The streaming endpoint emits each chunk as one SSE data event, ending
/// with the terminal chunk.
#[tokio::test]
async fn test_chat_stream_emits_sse_events() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_stream(&sse_payload(&["A ", "wren."])).await;

    let app = test_router(&mock.url());
    let response = app
        .oneshot(post_json(
            "/api/ai/chat-stream",
            json!({"user": "Tiny loud bird in the hedge?"}),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let body = body_string(response).await;
    assert!(body.contains(r#"data: {"delta":"A ","done":false}"#));
    assert!(body.contains(r#"data: {"delta":"wren.","done":false}"#));
    assert!(body.contains(r#"data: {"delta":"","done":true}"#));
}

/// A streaming request that fails upstream before the first chunk gets the
/// same sanitized error shape as the buffered endpoint.
#[tokio::test]
async fn test_chat_stream_upstream_failure_before_first_chunk() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_error(500, None, 1).await;

    let app = test_router(&mock.url());
    let response = app
        .oneshot(post_json("/api/ai/chat-stream", json!({"user": "hi"})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "ProviderError");
}

/// The streaming endpoint rejects an empty prompt.
#[tokio::test]
async fn test_chat_stream_empty_prompt_rejected() {
    init_tracing();
    let app = test_router("http://127.0.0.1:9");

    let response = app
        .oneshot(post_json("/api/ai/chat-stream", json!({"user": ""})))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
