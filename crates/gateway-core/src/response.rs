//! Buffered chat result types.

use serde::{Deserialize, Serialize};

/// The result of a buffered chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResult {
    /// Concatenated text of the first completion choice; empty if absent.
    pub content: String,
    /// The full decoded response payload, retained for diagnostics only.
    pub raw: serde_json::Value,
}

impl ChatResult {
    /// Build a result from a decoded provider response body.
    #[must_use]
    pub fn from_raw(raw: serde_json::Value) -> Self {
        let content = first_choice_content(&raw).to_string();
        Self { content, raw }
    }
}

/// Extract the first choice's message content from a decoded response body,
/// or the empty string if the path is absent.
#[must_use]
pub fn first_choice_content(raw: &serde_json::Value) -> &str {
    raw.pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
}
