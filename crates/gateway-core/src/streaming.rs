//! Streaming chunk types.
//!
//! [`ChatChunk`] is the caller-facing unit: a text delta plus a completion
//! flag. The remaining types model the provider's wire framing
//! (`choices[0].delta.content`) and exist only for decoding.

use serde::{Deserialize, Serialize};

/// One incremental decode step of a streamed response.
///
/// A stream is a sequence of chunks with `done == false` followed by exactly
/// one terminal chunk with `done == true` (whose delta may be empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChunk {
    /// The additional text produced since the previous chunk.
    pub delta: String,
    /// Whether the stream has ended.
    pub done: bool,
}

impl ChatChunk {
    /// Create a non-terminal delta chunk.
    #[must_use]
    pub fn delta(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            done: false,
        }
    }

    /// Create the terminal chunk.
    #[must_use]
    pub fn done() -> Self {
        Self {
            delta: String::new(),
            done: true,
        }
    }
}

/// A decoded provider stream event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamEvent {
    /// Completion choices carried by this event.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl StreamEvent {
    /// The first choice's delta content, or the empty string if absent.
    #[must_use]
    pub fn delta_content(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .unwrap_or("")
    }
}

/// A choice within a provider stream event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    /// The incremental delta for this choice.
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Reason the provider finished this choice, if any.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The delta payload of a stream choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    /// Role, present on the first event of a stream.
    #[serde(default)]
    pub role: Option<String>,
    /// Content fragment.
    #[serde(default)]
    pub content: Option<String>,
}
