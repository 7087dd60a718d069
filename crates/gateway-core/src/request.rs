//! Chat request types for the gateway.
//!
//! These model the inbound shape handed to the gateway client: an optional
//! system instruction, the user input (a single prompt or a full message
//! history), and optional per-request model/parameter overrides.

use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};

/// A chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Optional system instruction, prepended to the message list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The user input: a single prompt or an ordered message history.
    pub user: UserInput,

    /// Model override; falls back to the client's default model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Generation parameter overrides, merged over the client defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<GenerationParams>,

    /// Optional strict JSON-Schema output constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Create a request from a single user prompt.
    #[must_use]
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            user: UserInput::Prompt(prompt.into()),
            model: None,
            params: None,
            response_format: None,
        }
    }

    /// Create a request from an ordered message history.
    #[must_use]
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            system: None,
            user: UserInput::Messages(messages),
            model: None,
            params: None,
            response_format: None,
        }
    }

    /// Set the system instruction.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the model override.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the generation parameter overrides.
    #[must_use]
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the structured-output constraint.
    #[must_use]
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Validate the request.
    ///
    /// # Errors
    /// Returns an error if the user input is empty, a parameter is out of
    /// range, or the response format is malformed.
    pub fn validate(&self) -> GatewayResult<()> {
        match &self.user {
            UserInput::Prompt(prompt) => {
                if prompt.trim().is_empty() {
                    return Err(GatewayError::invalid_request("user prompt cannot be empty"));
                }
            }
            UserInput::Messages(messages) => {
                if messages.is_empty() {
                    return Err(GatewayError::invalid_request(
                        "user messages cannot be empty",
                    ));
                }
            }
        }

        if let Some(system) = &self.system {
            if system.trim().is_empty() {
                return Err(GatewayError::invalid_request(
                    "system instruction cannot be empty when present",
                ));
            }
        }

        if let Some(params) = &self.params {
            params.validate()?;
        }

        if let Some(format) = &self.response_format {
            format.validate()?;
        }

        Ok(())
    }
}

/// The user input of a [`ChatRequest`]: one prompt string or a message array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserInput {
    /// A single prompt, sent as one user-role message.
    Prompt(String),
    /// An ordered conversation history, sent verbatim.
    Messages(Vec<Message>),
}

/// A message in a chat conversation. Ordering is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: MessageRole,
    /// Content of the message.
    pub content: String,
}

impl Message {
    /// Create a new message.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a tool-result message.
    #[must_use]
    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Tool, content)
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message.
    System,
    /// User message.
    User,
    /// Assistant message.
    Assistant,
    /// Tool response message.
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// Numeric generation controls. All fields optional; absent fields are
/// omitted from the outbound request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature (0.0 - 2.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Top-p (nucleus sampling) parameter (0.0 - 1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Presence penalty (-2.0 to 2.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,

    /// Frequency penalty (-2.0 to 2.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,

    /// Seed for deterministic generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl GenerationParams {
    /// Shallow-merge `overrides` over `self`; override keys win.
    #[must_use]
    pub fn merge(&self, overrides: &Self) -> Self {
        Self {
            temperature: overrides.temperature.or(self.temperature),
            max_tokens: overrides.max_tokens.or(self.max_tokens),
            top_p: overrides.top_p.or(self.top_p),
            presence_penalty: overrides.presence_penalty.or(self.presence_penalty),
            frequency_penalty: overrides.frequency_penalty.or(self.frequency_penalty),
            seed: overrides.seed.or(self.seed),
        }
    }

    /// Validate parameter ranges.
    ///
    /// # Errors
    /// Returns an error if any parameter is out of range.
    pub fn validate(&self) -> GatewayResult<()> {
        if let Some(temp) = self.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(GatewayError::invalid_request(format!(
                    "temperature must be between 0.0 and 2.0, got {temp}"
                )));
            }
        }

        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 {
                return Err(GatewayError::invalid_request("max_tokens must be positive"));
            }
        }

        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(GatewayError::invalid_request(format!(
                    "top_p must be between 0.0 and 1.0, got {top_p}"
                )));
            }
        }

        if let Some(pp) = self.presence_penalty {
            if !(-2.0..=2.0).contains(&pp) {
                return Err(GatewayError::invalid_request(format!(
                    "presence_penalty must be between -2.0 and 2.0, got {pp}"
                )));
            }
        }

        if let Some(fp) = self.frequency_penalty {
            if !(-2.0..=2.0).contains(&fp) {
                return Err(GatewayError::invalid_request(format!(
                    "frequency_penalty must be between -2.0 and 2.0, got {fp}"
                )));
            }
        }

        Ok(())
    }
}

/// Strict JSON-Schema output constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Format type; always `json_schema`.
    #[serde(rename = "type")]
    pub format_type: String,
    /// Schema declaration.
    pub json_schema: JsonSchemaFormat,
}

impl ResponseFormat {
    /// Create a strict JSON-Schema response format.
    #[must_use]
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            format_type: "json_schema".to_string(),
            json_schema: JsonSchemaFormat {
                name: name.into(),
                strict: true,
                schema,
            },
        }
    }

    /// Validate the format declaration.
    ///
    /// # Errors
    /// Returns an error if the schema name is empty or strict mode is off.
    pub fn validate(&self) -> GatewayResult<()> {
        if self.format_type != "json_schema" {
            return Err(GatewayError::invalid_request(format!(
                "unsupported response_format type: {}",
                self.format_type
            )));
        }
        if self.json_schema.name.trim().is_empty() {
            return Err(GatewayError::invalid_request(
                "response_format schema name cannot be empty",
            ));
        }
        if !self.json_schema.strict {
            return Err(GatewayError::invalid_request(
                "response_format must declare strict mode",
            ));
        }
        Ok(())
    }
}

/// The schema declaration inside a [`ResponseFormat`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchemaFormat {
    /// Schema name, reported back by the provider.
    pub name: String,
    /// Strict conformance flag; always true.
    pub strict: bool,
    /// The JSON Schema the output must conform to.
    pub schema: serde_json::Value,
}
