//! API error responses.
//!
//! Provider and network failures reach this layer fully detailed; the
//! outbound response carries a sanitized code/message envelope while the
//! detail is logged internally.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gateway_core::GatewayError;
use serde_json::json;
use tracing::error;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create an error with the given status, code and message.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the response body.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// A 400 request-validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ValidationError", message)
    }

    /// A sanitized 500 error.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "InternalServerError",
            "An unexpected error occurred",
        )
    }

    /// The HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        // The detailed error is for internal logs only; the response below
        // carries a sanitized rendering.
        error!(error = %err, "Gateway call failed");

        match err {
            GatewayError::Authentication { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "AuthenticationError",
                "AI provider authentication failed",
            ),
            GatewayError::BadRequest { message } => {
                Self::new(StatusCode::BAD_REQUEST, "BadRequest", message)
            }
            GatewayError::ModelNotFound => Self::new(
                StatusCode::NOT_FOUND,
                "ModelNotFound",
                "Requested model not found or unavailable",
            ),
            GatewayError::Conflict { message } => {
                Self::new(StatusCode::CONFLICT, "Conflict", message)
            }
            GatewayError::RateLimited { .. } => Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RateLimitExceeded",
                "Rate limit exceeded",
            ),
            GatewayError::Provider { .. } | GatewayError::Streaming { .. } => Self::new(
                StatusCode::BAD_GATEWAY,
                "ProviderError",
                "AI provider error",
            ),
            GatewayError::Timeout { .. } => Self::new(
                StatusCode::REQUEST_TIMEOUT,
                "Timeout",
                "Request timeout",
            ),
            GatewayError::Network { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "NetworkError",
                "Network request failed",
            ),
            GatewayError::Parse { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "ParseError",
                "Failed to parse JSON response",
            ),
            GatewayError::Validation { violations } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "ValidationError",
                "Response does not match expected schema",
            )
            .with_details(json!(violations)),
            GatewayError::Configuration { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalServerError",
                "AI service not configured",
            ),
            GatewayError::InvalidRequest { message } => Self::validation(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "details": self.details,
            }
        });

        (self.status, Json(body)).into_response()
    }
}
