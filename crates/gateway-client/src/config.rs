//! Client configuration.

use gateway_core::{redact_value, GenerationParams};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

/// Configuration for an [`crate::OpenRouterClient`].
///
/// Immutable after construction. A derived configuration (same credential,
/// different model or parameters) is produced by
/// [`crate::OpenRouterClient::with_model`] without mutating the original.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the provider API, without a trailing slash.
    pub(crate) base_url: String,
    /// API credential; attached to outbound requests only, never logged.
    pub(crate) api_key: Secret<String>,
    /// Model used when a request carries no override.
    pub(crate) default_model: String,
    /// Generation parameters used when a request carries no override.
    pub(crate) default_params: GenerationParams,
    /// Application name, sent as the X-Title header.
    pub(crate) app_name: Option<String>,
    /// Application URL, sent as the HTTP-Referer header.
    pub(crate) app_url: Option<String>,
    /// Per-attempt timeout.
    pub(crate) timeout: Duration,
    /// Maximum retry attempts after the first.
    pub(crate) max_retries: u32,
    /// Base delay of the exponential backoff schedule.
    pub(crate) retry_base_delay: Duration,
}

impl ClientConfig {
    /// Default provider endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";
    /// Default per-attempt timeout (60 seconds).
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    /// Default maximum retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    /// Default backoff base delay (500 milliseconds).
    pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

    /// Create a configuration with default endpoint, timeout and retry
    /// settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>, default_model: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            api_key: Secret::new(api_key.into()),
            default_model: default_model.into(),
            default_params: GenerationParams::default(),
            app_name: None,
            app_url: None,
            timeout: Self::DEFAULT_TIMEOUT,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            retry_base_delay: Self::DEFAULT_RETRY_BASE_DELAY,
        }
    }

    /// Set the base URL. A trailing slash is stripped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the default generation parameters.
    #[must_use]
    pub fn with_default_params(mut self, params: GenerationParams) -> Self {
        self.default_params = params;
        self
    }

    /// Set the application name (X-Title header).
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Set the application URL (HTTP-Referer header).
    #[must_use]
    pub fn with_app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = Some(url.into());
        self
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff base delay. Intended for tests that exercise the
    /// retry schedule without waiting on real delays.
    #[must_use]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Get the default generation parameters.
    #[must_use]
    pub fn default_params(&self) -> &GenerationParams {
        &self.default_params
    }

    /// Get the per-attempt timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the maximum number of retries.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the API credential for header construction.
    pub(crate) fn api_key_value(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// A loggable snapshot of this configuration with credential-shaped
    /// fields masked.
    #[must_use]
    pub fn diagnostics(&self) -> serde_json::Value {
        let raw = serde_json::json!({
            "base_url": self.base_url,
            "api_key": self.api_key.expose_secret(),
            "default_model": self.default_model,
            "default_params": self.default_params,
            "app_name": self.app_name,
            "app_url": self.app_url,
            "timeout_ms": self.timeout.as_millis() as u64,
            "max_retries": self.max_retries,
        });
        redact_value(&raw)
    }
}
