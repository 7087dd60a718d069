//! Shared application state.

use gateway_client::OpenRouterClient;

/// State shared by all request handlers.
///
/// The gateway client is stateless between calls, so cloning the state per
/// request is cheap and requires no locking.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The OpenRouter gateway client.
    pub client: OpenRouterClient,
}

impl AppState {
    /// Create state around a gateway client.
    #[must_use]
    pub fn new(client: OpenRouterClient) -> Self {
        Self { client }
    }
}
