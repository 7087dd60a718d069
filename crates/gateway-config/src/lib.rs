//! # Gateway Config
//!
//! Configuration management for the Nature Log AI gateway.
//!
//! Configuration is assembled from an optional YAML file (path in the
//! `GATEWAY_CONFIG` environment variable) overlaid with environment
//! variables. The OpenRouter credential only ever enters through the
//! environment and is held as a [`secrecy::Secret`]; its absence is fatal
//! at startup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use gateway_core::GenerationParams;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "GATEWAY_CONFIG";
/// Default environment variable carrying the OpenRouter credential.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment override carried an unusable value.
    #[error("invalid value for {variable}: {message}")]
    InvalidEnv {
        /// Variable that failed to parse.
        variable: String,
        /// Description of the problem.
        message: String,
    },

    /// The API credential is missing.
    #[error("OpenRouter API key is not configured (set {API_KEY_ENV})")]
    MissingApiKey,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// OpenRouter client settings.
    pub openrouter: OpenRouterConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level filter.
    pub level: String,
    /// Emit JSON-formatted log lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// OpenRouter client settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenRouterConfig {
    /// Provider endpoint.
    pub base_url: String,
    /// Model used when a request carries no override.
    pub default_model: String,
    /// Default generation parameters.
    pub default_params: Option<GenerationParams>,
    /// Application name, sent as the X-Title header.
    pub app_name: Option<String>,
    /// Application URL, sent as the HTTP-Referer header.
    pub app_url: Option<String>,
    /// Per-attempt timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Maximum retries after the first attempt.
    pub max_retries: u32,
    /// Environment variable carrying the credential.
    pub api_key_env: String,
    /// The credential itself; populated from the environment, never from
    /// the file.
    #[serde(skip)]
    api_key: Option<Secret<String>>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            default_model: "google/gemini-flash-1.5".to_string(),
            default_params: None,
            app_name: Some("Nature Log".to_string()),
            app_url: None,
            timeout: Duration::from_secs(60),
            max_retries: 2,
            api_key_env: API_KEY_ENV.to_string(),
            api_key: None,
        }
    }
}

impl OpenRouterConfig {
    /// Expose the credential for client construction.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] when no credential was loaded.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Set the credential. Intended for tests.
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(Secret::new(key.into()));
    }
}

/// Load configuration from the optional file plus environment overrides.
///
/// # Errors
/// Returns an error when the file cannot be read or parsed, an override is
/// malformed, or the API credential is missing.
pub async fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = match env::var(CONFIG_PATH_ENV) {
        Ok(path) => load_file(&path).await?,
        Err(_) => AppConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    let api_key = env::var(&config.openrouter.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)?;
    config.openrouter.api_key = Some(Secret::new(api_key));

    debug!(
        host = %config.server.host,
        port = config.server.port,
        model = %config.openrouter.default_model,
        "Configuration assembled"
    );

    Ok(config)
}

/// Parse a YAML configuration file.
async fn load_file(path: &str) -> Result<AppConfig, ConfigError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Overlay recognized environment variables onto the configuration.
fn apply_env_overrides(config: &mut AppConfig) -> Result<(), ConfigError> {
    if let Ok(host) = env::var("GATEWAY_HOST") {
        config.server.host = host;
    }
    if let Ok(port) = env::var("GATEWAY_PORT") {
        config.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
            variable: "GATEWAY_PORT".to_string(),
            message: format!("expected a port number, got {port:?}"),
        })?;
    }
    if let Ok(level) = env::var("GATEWAY_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(base_url) = env::var("OPENROUTER_BASE_URL") {
        config.openrouter.base_url = base_url;
    }
    if let Ok(model) = env::var("OPENROUTER_DEFAULT_MODEL") {
        config.openrouter.default_model = model;
    }
    if let Ok(name) = env::var("OPENROUTER_APP_NAME") {
        config.openrouter.app_name = Some(name);
    }
    if let Ok(url) = env::var("OPENROUTER_APP_URL") {
        config.openrouter.app_url = Some(url);
    }
    Ok(())
}
