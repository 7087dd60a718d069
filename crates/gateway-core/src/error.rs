//! Error types for the AI gateway.

use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by the gateway client and its collaborators.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The provider rejected the credential (HTTP 401/403).
    #[error("provider authentication failed: {message}")]
    Authentication {
        /// Error message from the provider.
        message: String,
    },

    /// The provider rejected the request as malformed (HTTP 400).
    #[error("bad request: {message}")]
    BadRequest {
        /// Error message from the provider.
        message: String,
    },

    /// The requested model does not exist or is unavailable (HTTP 404).
    #[error("model not found or unavailable")]
    ModelNotFound,

    /// The provider reported a conflict (HTTP 409).
    #[error("conflict: {message}")]
    Conflict {
        /// Error message from the provider.
        message: String,
    },

    /// The provider rate-limited the request (HTTP 429).
    #[error("rate limit exceeded")]
    RateLimited {
        /// Seconds to wait before retrying, from the Retry-After header.
        retry_after: Option<u64>,
    },

    /// The provider failed internally (HTTP 5xx).
    #[error("provider error ({status}): {message}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Error message from the provider.
        message: String,
    },

    /// An attempt did not complete within the configured timeout.
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout {
        /// Milliseconds the attempt was allowed to run.
        elapsed_ms: u64,
    },

    /// A transient transport-level failure.
    #[error("network request failed: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// Structured-output content was not valid JSON.
    #[error("failed to parse structured output: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// Structured-output content did not conform to the supplied schema.
    #[error("structured output does not match the expected schema")]
    Validation {
        /// One entry per schema violation.
        violations: Vec<String>,
    },

    /// The response byte stream failed mid-flight.
    #[error("streaming error: {message}")]
    Streaming {
        /// Description of the stream failure.
        message: String,
    },

    /// Invalid or missing configuration; fatal at startup.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// A request failed local validation before any network call.
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of the invalid field.
        message: String,
    },
}

impl GatewayError {
    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a rate-limited error.
    pub fn rate_limited(retry_after: Option<u64>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Create a provider error.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(elapsed: std::time::Duration) -> Self {
        Self::Timeout {
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a validation error from a list of violations.
    pub fn validation(violations: Vec<String>) -> Self {
        Self::Validation { violations }
    }

    /// Create a streaming error.
    pub fn streaming(message: impl Into<String>) -> Self {
        Self::Streaming {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Whether a retry may resolve this error.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network { .. } => true,
            Self::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The provider-side HTTP status associated with this error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::BadRequest { .. } => Some(400),
            Self::ModelNotFound => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::RateLimited { .. } => Some(429),
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The Retry-After hint carried by a rate-limit error, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Self::RateLimited { retry_after } => {
                retry_after.map(std::time::Duration::from_secs)
            }
            _ => None,
        }
    }
}

/// Error envelope returned by the provider API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProviderErrorBody {
    /// Error details.
    pub error: ProviderErrorDetail,
}

/// Detailed error information from the provider API.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProviderErrorDetail {
    /// Human-readable error message.
    pub message: String,
    /// Provider-specific error code.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}
