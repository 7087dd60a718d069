//! Mock OpenRouter API server for integration testing.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The chat-completions path relative to the mock base URL.
pub const COMPLETIONS_PATH: &str = "/chat/completions";

/// Mock OpenRouter API server.
pub struct MockOpenRouter {
    /// The underlying wiremock server.
    pub server: MockServer,
}

impl MockOpenRouter {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// The base URL for this mock server.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Mount a successful chat completion response, expecting exactly
    /// `expected_calls` requests.
    pub async fn mock_chat_completion(&self, content: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_response_body(content)),
            )
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Mount an error response with optional Retry-After header, expecting
    /// exactly `expected_calls` requests.
    pub async fn mock_error(&self, status: u16, retry_after: Option<u64>, expected_calls: u64) {
        let mut template =
            ResponseTemplate::new(status).set_body_json(error_body("simulated provider failure"));
        if let Some(seconds) = retry_after {
            template = template.append_header("Retry-After", seconds.to_string().as_str());
        }

        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(template)
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Mount an error response that only matches the first `times` requests,
    /// letting a later mock serve the rest.
    pub async fn mock_error_up_to(&self, status: u16, times: u64) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(error_body("simulated provider failure")),
            )
            .up_to_n_times(times)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Mount a delayed 200 response, for timeout tests.
    pub async fn mock_delayed_completion(&self, content: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_response_body(content))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount a streaming response with the given raw SSE payload.
    pub async fn mock_stream(&self, payload: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(payload.as_bytes().to_vec(), "text/event-stream"),
            )
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

/// A provider chat-completion response body.
pub fn chat_response_body(content: &str) -> Value {
    json!({
        "id": "gen-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "google/gemini-flash-1.5",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
    })
}

/// A provider error body.
pub fn error_body(message: &str) -> Value {
    json!({"error": {"message": message, "code": 500}})
}

/// An SSE payload carrying one `data:` event per delta plus the terminator.
pub fn sse_payload(deltas: &[&str]) -> String {
    let mut payload = String::new();
    for delta in deltas {
        payload.push_str(&format!(
            "data: {}\n\n",
            json!({"choices": [{"delta": {"content": delta}}]})
        ));
    }
    payload.push_str("data: [DONE]\n\n");
    payload
}
