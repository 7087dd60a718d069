//! HTTP request handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::{Stream, StreamExt};
use gateway_core::{ChatRequest, ChatResult, GenerationParams, UserInput};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::time::Instant;
use tracing::{error, info, instrument};

use crate::error::ApiError;
use crate::extractors::{JsonBody, RequestId};
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Liveness check endpoint.
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}

/// Readiness check endpoint.
pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, "ready")
}

/// Buffered chat completion endpoint.
#[instrument(skip(state, body, request_id), fields(request_id = %request_id.0))]
pub async fn chat(
    State(state): State<AppState>,
    request_id: RequestId,
    JsonBody(body): JsonBody<ChatRequest>,
) -> Result<Json<ChatResult>, ApiError> {
    body.validate()?;

    let start = Instant::now();
    let model = body
        .model
        .clone()
        .unwrap_or_else(|| state.client.config().default_model().to_string());

    let result = state.client.generate_chat(&body).await?;

    info!(
        model = %model,
        has_response_format = body.response_format.is_some(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Chat completion served"
    );

    Ok(Json(result))
}

/// Request body for the streaming endpoint; the prompt-string form only.
#[derive(Debug, Deserialize)]
pub struct StreamChatRequest {
    /// Optional system instruction.
    #[serde(default)]
    pub system: Option<String>,
    /// The user prompt.
    pub user: String,
    /// Model override.
    #[serde(default)]
    pub model: Option<String>,
    /// Generation parameter overrides.
    #[serde(default)]
    pub params: Option<GenerationParams>,
}

impl From<StreamChatRequest> for ChatRequest {
    fn from(body: StreamChatRequest) -> Self {
        Self {
            system: body.system,
            user: UserInput::Prompt(body.user),
            model: body.model,
            params: body.params,
            response_format: None,
        }
    }
}

/// Streaming chat completion endpoint.
///
/// Emits each chunk as one `data:` event; the final event carries
/// `done: true`. An upstream failure before the first chunk maps to the same
/// error responses as the buffered endpoint.
#[instrument(skip(state, body, request_id), fields(request_id = %request_id.0))]
pub async fn chat_stream(
    State(state): State<AppState>,
    request_id: RequestId,
    JsonBody(body): JsonBody<StreamChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let request = ChatRequest::from(body);
    request.validate()?;

    let start = Instant::now();
    let model = request
        .model
        .clone()
        .unwrap_or_else(|| state.client.config().default_model().to_string());

    let chunks = state.client.stream_chat(&request).await?;

    info!(model = %model, "Chat stream opened");

    let events = chunks.map(move |chunk| {
        let event = match chunk {
            Ok(chunk) => {
                if chunk.done {
                    info!(
                        latency_ms = start.elapsed().as_millis() as u64,
                        "Chat stream completed"
                    );
                }
                Event::default()
                    .json_data(&chunk)
                    .unwrap_or_else(|_| Event::default().data("{}"))
            }
            Err(e) => {
                error!(error = %e, "Chat stream failed mid-flight");
                Event::default()
                    .event("error")
                    .data("AI provider stream failed")
            }
        };
        Ok(event)
    });

    Ok(Sse::new(events))
}
