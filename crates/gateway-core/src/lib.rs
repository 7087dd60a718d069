//! # Gateway Core
//!
//! Core types and error handling for the Nature Log AI gateway.
//!
//! This crate provides the foundational types used throughout the gateway:
//! - Chat request and result types
//! - Streaming chunk types (caller-facing and wire-side)
//! - Error types and handling
//! - Credential redaction for diagnostic output

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod redact;
pub mod request;
pub mod response;
pub mod streaming;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult, ProviderErrorBody, ProviderErrorDetail};
pub use redact::redact_value;
pub use request::{
    ChatRequest, GenerationParams, JsonSchemaFormat, Message, MessageRole, ResponseFormat,
    UserInput,
};
pub use response::{first_choice_content, ChatResult};
pub use streaming::{ChatChunk, ChunkChoice, ChunkDelta, StreamEvent};
