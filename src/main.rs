//! # Nature Log AI Gateway
//!
//! Standalone AI-gateway service for the Nature Log observation platform.
//!
//! The service fronts the OpenRouter chat-completions API for the web
//! application: buffered and streaming chat endpoints, retries with
//! exponential backoff, per-attempt timeouts, and schema-validated
//! structured output.
//!
//! ## Usage
//!
//! ```bash
//! # Start with environment configuration
//! OPENROUTER_API_KEY=sk-or-... naturelog-ai-gateway
//!
//! # Start with a config file
//! GATEWAY_CONFIG=/etc/naturelog/gateway.yaml naturelog-ai-gateway
//!
//! # Override the bind port
//! GATEWAY_PORT=9000 naturelog-ai-gateway
//! ```

use gateway_client::{ClientConfig, OpenRouterClient};
use gateway_config::{load_config, AppConfig};
use gateway_server::{AppState, Server, ServerConfig};
use gateway_telemetry::{init_logging, LoggingConfig};
use tracing::info;

/// Application entry point.
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("naturelog-ai-gateway failed: {e:#}");
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run() -> anyhow::Result<()> {
    // Configuration first: logging format and level come from it. A missing
    // API key aborts startup here.
    let config = load_config().await?;

    init_logging(
        &LoggingConfig::new()
            .with_level(&config.logging.level)
            .with_json(config.logging.json),
    )?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        model = %config.openrouter.default_model,
        "Starting Nature Log AI gateway"
    );

    let client = build_client(&config)?;
    let state = AppState::new(client);

    let server_config = ServerConfig::new()
        .with_host(&config.server.host)
        .with_port(config.server.port);

    Server::new(server_config, state).run().await?;

    Ok(())
}

/// Construct the OpenRouter client from loaded configuration.
fn build_client(config: &AppConfig) -> anyhow::Result<OpenRouterClient> {
    let openrouter = &config.openrouter;

    let mut client_config = ClientConfig::new(openrouter.api_key()?, &openrouter.default_model)
        .with_base_url(&openrouter.base_url)
        .with_timeout(openrouter.timeout)
        .with_max_retries(openrouter.max_retries);

    if let Some(params) = openrouter.default_params {
        client_config = client_config.with_default_params(params);
    }
    if let Some(app_name) = &openrouter.app_name {
        client_config = client_config.with_app_name(app_name);
    }
    if let Some(app_url) = &openrouter.app_url {
        client_config = client_config.with_app_url(app_url);
    }

    Ok(OpenRouterClient::new(client_config)?)
}
