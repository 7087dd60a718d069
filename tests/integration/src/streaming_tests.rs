//! Streaming integration tests
//!
//! Stream decode behavior over real HTTP responses from a mock provider.

use crate::helpers::*;
use crate::mock_openrouter::*;
use futures::StreamExt;
use gateway_core::{ChatChunk, ChatRequest, GatewayError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

/// The canonical two-event payload yields exactly one delta chunk and the
/// terminal chunk.
#[tokio::test]
async fn test_stream_yields_delta_then_terminal() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_stream("data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n")
        .await;

    let client = test_client(&mock.url());
    let stream = client
        .stream_chat(&ChatRequest::from_prompt("hi"))
        .await
        .expect("stream opened");

    let chunks: Vec<ChatChunk> = stream.map(|c| c.expect("chunk")).collect().await;
    assert_eq!(chunks, vec![ChatChunk::delta("Hi"), ChatChunk::done()]);
}

/// Deltas arrive in order and concatenate to the full completion.
#[tokio::test]
async fn test_stream_deltas_concatenate_in_order() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_stream(&sse_payload(&["The ", "grey ", "heron ", "waits."]))
        .await;

    let client = test_client(&mock.url());
    let stream = client
        .stream_chat(&ChatRequest::from_prompt("hi"))
        .await
        .expect("stream opened");

    let content = stream.collect_content().await.expect("content");
    assert_eq!(content, "The grey heron waits.");
}

/// A malformed event between two valid ones is skipped without aborting the
/// stream.
#[tokio::test]
async fn test_stream_malformed_line_skipped() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_stream(
        "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n\
         data: {not json}\n\n\
         data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n\
         data: [DONE]\n\n",
    )
    .await;

    let client = test_client(&mock.url());
    let stream = client
        .stream_chat(&ChatRequest::from_prompt("hi"))
        .await
        .expect("stream opened");

    let chunks: Vec<ChatChunk> = stream.map(|c| c.expect("chunk")).collect().await;
    assert_eq!(
        chunks,
        vec![
            ChatChunk::delta("a"),
            ChatChunk::delta("b"),
            ChatChunk::done()
        ]
    );
}

/// The streaming request body carries stream: true.
#[tokio::test]
async fn test_stream_request_sets_stream_flag() {
    init_tracing();
    let mock = MockOpenRouter::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_payload(&["ok"]).into_bytes(), "text/event-stream"),
        )
        .expect(1)
        .mount(&mock.server)
        .await;

    let client = test_client(&mock.url());
    let content = client
        .stream_chat(&ChatRequest::from_prompt("hi"))
        .await
        .expect("stream opened")
        .collect_content()
        .await
        .expect("content");

    assert_eq!(content, "ok");
}

/// A non-2xx status fails with the same typed error as the buffered path,
/// before any chunk is produced.
#[tokio::test]
async fn test_stream_non_success_status_is_typed_error() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_error(404, None, 1).await;

    let client = test_client(&mock.url());
    let result = client.stream_chat(&ChatRequest::from_prompt("hi")).await;

    assert!(matches!(result, Err(GatewayError::ModelNotFound)));
}

/// The retry layer runs before any streaming bytes are consumed: a 503 then
/// a healthy stream recovers transparently.
#[tokio::test]
async fn test_stream_retries_before_first_byte() {
    init_tracing();
    let mock = MockOpenRouter::start().await;
    mock.mock_error_up_to(503, 1).await;
    mock.mock_stream(&sse_payload(&["recovered"])).await;

    let client = test_client(&mock.url());
    let content = client
        .stream_chat(&ChatRequest::from_prompt("hi"))
        .await
        .expect("stream opened after retry")
        .collect_content()
        .await
        .expect("content");

    assert_eq!(content, "recovered");
}

/// Dropping the stream early releases it without panics or hangs; a fresh
/// call still works.
#[tokio::test]
async fn test_stream_early_drop_releases_connection() {
    init_tracing();
    let mock = MockOpenRouter::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_payload(&["a", "b", "c"]).into_bytes(), "text/event-stream"),
        )
        .expect(2)
        .mount(&mock.server)
        .await;

    let client = test_client(&mock.url());

    let mut stream = client
        .stream_chat(&ChatRequest::from_prompt("hi"))
        .await
        .expect("stream opened");
    let first = stream.next().await.expect("first chunk").expect("chunk");
    assert_eq!(first, ChatChunk::delta("a"));
    drop(stream);

    // The client is still usable after the early drop.
    let content = client
        .stream_chat(&ChatRequest::from_prompt("hi"))
        .await
        .expect("second stream")
        .collect_content()
        .await
        .expect("content");
    assert_eq!(content, "abc");
}
