//! HTTP client for the OpenRouter chat-completions API.

use crate::config::ClientConfig;
use crate::retry::{is_transient_description, RetryPolicy};
use crate::sse::ChatStream;
use gateway_core::{
    ChatRequest, ChatResult, GatewayError, GatewayResult, GenerationParams, Message,
    ProviderErrorBody, ResponseFormat, UserInput,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Client for the OpenRouter chat-completions API.
///
/// Holds no request-scoped state: every call is independent and a single
/// instance is safe to share across concurrent callers. Cloning is cheap
/// (the configuration is reference-counted and the HTTP connection pool is
/// shared).
#[derive(Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    retry: RetryPolicy,
}

impl OpenRouterClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    /// Returns a configuration error when the credential is missing, the
    /// base URL is invalid, or the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> GatewayResult<Self> {
        if config.api_key_value().trim().is_empty() {
            return Err(GatewayError::configuration("OpenRouter API key is required"));
        }
        if config.default_model.trim().is_empty() {
            return Err(GatewayError::configuration("default model is required"));
        }
        Url::parse(&config.base_url)
            .map_err(|e| GatewayError::configuration(format!("invalid base URL: {e}")))?;

        let headers = Self::build_headers(&config)?;
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GatewayError::configuration(format!("failed to build HTTP client: {e}")))?;

        let retry = RetryPolicy::new(config.max_retries, config.retry_base_delay);

        debug!(config = %config.diagnostics(), "OpenRouter client initialized");

        Ok(Self {
            http,
            config: Arc::new(config),
            retry,
        })
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Derive a new, independently configured client with the model and/or
    /// parameters overridden.
    ///
    /// The credential, base URL, app identification, timeout and retry
    /// settings are shared by copy; parameters are merged over the current
    /// defaults, not replaced. Calling with no overrides yields a client
    /// equivalent to the receiver.
    #[must_use]
    pub fn with_model(&self, model: Option<&str>, params: Option<GenerationParams>) -> Self {
        let mut config = (*self.config).clone();
        if let Some(model) = model {
            config.default_model = model.to_string();
        }
        if let Some(params) = params {
            config.default_params = config.default_params.merge(&params);
        }

        Self {
            http: self.http.clone(),
            retry: RetryPolicy::new(config.max_retries, config.retry_base_delay),
            config: Arc::new(config),
        }
    }

    /// Generate a buffered chat completion.
    ///
    /// # Errors
    /// Surfaces a typed error after the retry budget is exhausted; never
    /// returns a partial result.
    #[instrument(skip(self, request), fields(model = request.model.as_deref().unwrap_or(&self.config.default_model)))]
    pub async fn generate_chat(&self, request: &ChatRequest) -> GatewayResult<ChatResult> {
        let payload = self.build_payload(request, false);
        let response = self.execute_with_retry(&payload).await?;

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::parse(format!("failed to decode response body: {e}")))?;

        Ok(ChatResult::from_raw(raw))
    }

    /// Generate a streaming chat completion.
    ///
    /// Returns a lazy, single-pass [`ChatStream`]; the retry layer runs
    /// before any bytes of the body are consumed, so a non-2xx status is
    /// surfaced as a typed error before the first chunk.
    #[instrument(skip(self, request), fields(model = request.model.as_deref().unwrap_or(&self.config.default_model)))]
    pub async fn stream_chat(&self, request: &ChatRequest) -> GatewayResult<ChatStream> {
        let payload = self.build_payload(request, true);
        let response = self.execute_with_retry(&payload).await?;

        Ok(ChatStream::new(response.bytes_stream()))
    }

    /// Build the ordered message sequence for a request: the optional system
    /// instruction first, then the user prompt or the provided history
    /// verbatim.
    #[must_use]
    pub fn build_messages(request: &ChatRequest) -> Vec<Message> {
        let mut messages = Vec::new();

        if let Some(system) = &request.system {
            messages.push(Message::system(system.clone()));
        }

        match &request.user {
            UserInput::Prompt(prompt) => messages.push(Message::user(prompt.clone())),
            UserInput::Messages(history) => messages.extend(history.iter().cloned()),
        }

        messages
    }

    fn build_payload(&self, request: &ChatRequest, stream: bool) -> CompletionPayload {
        let params = match &request.params {
            Some(overrides) => self.config.default_params.merge(overrides),
            None => self.config.default_params,
        };

        CompletionPayload {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            messages: Self::build_messages(request),
            response_format: request.response_format.clone(),
            params,
            stream,
        }
    }

    fn build_headers(config: &ClientConfig) -> GatewayResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key_value()))
            .map_err(|e| GatewayError::configuration(format!("invalid API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        if let Some(app_url) = &config.app_url {
            headers.insert(
                HeaderName::from_static("http-referer"),
                HeaderValue::from_str(app_url)
                    .map_err(|e| GatewayError::configuration(format!("invalid app URL: {e}")))?,
            );
        }

        if let Some(app_name) = &config.app_name {
            headers.insert(
                HeaderName::from_static("x-title"),
                HeaderValue::from_str(app_name)
                    .map_err(|e| GatewayError::configuration(format!("invalid app name: {e}")))?,
            );
        }

        Ok(headers)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Issue the outbound POST with retry, backoff and per-attempt timeout.
    ///
    /// Retries on 429, 5xx and transient transport failures until the budget
    /// is exhausted; a `Retry-After` header overrides the computed delay for
    /// the next attempt only.
    async fn execute_with_retry(
        &self,
        payload: &CompletionPayload,
    ) -> GatewayResult<reqwest::Response> {
        let url = self.completions_url();
        let mut attempt: u32 = 0;

        loop {
            let send = self.http.post(&url).json(payload).send();

            match tokio::time::timeout(self.config.timeout, send).await {
                Ok(Ok(response)) => {
                    let status = response.status();
                    if status.is_success() {
                        if attempt > 0 {
                            debug!(attempt, "Retry succeeded");
                        }
                        return Ok(response);
                    }

                    let retry_after = parse_retry_after(response.headers());
                    let error = error_from_response(response).await;

                    if self.retry.allows_retry(attempt, &error) {
                        let delay = self.retry.next_delay(attempt, retry_after);
                        warn!(
                            attempt = attempt + 1,
                            max_retries = self.retry.max_retries(),
                            status = status.as_u16(),
                            delay_ms = delay.as_millis() as u64,
                            "Retrying after provider error"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(error);
                }
                Ok(Err(e)) => {
                    let transient = is_transient_transport(&e);
                    let error = self.map_transport_error(&e);

                    if transient && attempt < self.retry.max_retries() {
                        let delay = self.retry.next_delay(attempt, None);
                        warn!(
                            attempt = attempt + 1,
                            max_retries = self.retry.max_retries(),
                            error = %error,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying after transport failure"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(error);
                }
                Err(_elapsed) => {
                    let error = GatewayError::timeout(self.config.timeout);

                    if attempt < self.retry.max_retries() {
                        let delay = self.retry.next_delay(attempt, None);
                        warn!(
                            attempt = attempt + 1,
                            max_retries = self.retry.max_retries(),
                            timeout_ms = self.config.timeout.as_millis() as u64,
                            "Retrying after attempt timeout"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(error);
                }
            }
        }
    }

    fn map_transport_error(&self, error: &reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::timeout(self.config.timeout)
        } else {
            GatewayError::network(describe_error(error))
        }
    }
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("base_url", &self.config.base_url)
            .field("default_model", &self.config.default_model)
            .finish_non_exhaustive()
    }
}

/// Outbound request body for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct CompletionPayload {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(flatten)]
    params: GenerationParams,
    stream: bool,
}

/// Map a non-2xx response to a typed error, reading the body for the
/// provider's message.
async fn error_from_response(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    let retry_after = parse_retry_after(response.headers());

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ProviderErrorBody>(&body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                format!("HTTP {status}")
            } else {
                body
            }
        });

    match status {
        401 | 403 => GatewayError::authentication(message),
        400 => GatewayError::bad_request(message),
        404 => GatewayError::ModelNotFound,
        409 => GatewayError::conflict(message),
        429 => GatewayError::rate_limited(retry_after.map(|d| d.as_secs())),
        status => GatewayError::provider(status, message),
    }
}

/// Parse a `Retry-After: <seconds>` header.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Whether a transport failure is worth retrying.
fn is_transient_transport(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || is_transient_description(&describe_error(error))
}

/// Flatten an error and its source chain into one description.
fn describe_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut description = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}
