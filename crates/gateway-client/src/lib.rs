//! # Gateway Client
//!
//! OpenRouter chat-completion client for the Nature Log AI gateway.
//!
//! The client translates a [`gateway_core::ChatRequest`] into an outbound
//! call against the OpenRouter chat-completions API and translates the
//! response into either a single [`gateway_core::ChatResult`] or a lazy
//! stream of [`gateway_core::ChatChunk`]s.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use gateway_client::{ClientConfig, OpenRouterClient};
//! use gateway_core::ChatRequest;
//!
//! #[tokio::main]
//! async fn main() -> gateway_core::GatewayResult<()> {
//!     let config = ClientConfig::new("sk-or-...", "google/gemini-flash-1.5")
//!         .with_app_name("Nature Log");
//!     let client = OpenRouterClient::new(config)?;
//!
//!     let request = ChatRequest::from_prompt("What bird sings at dawn in May?");
//!     let result = client.generate_chat(&request).await?;
//!     println!("{}", result.content);
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! # use gateway_client::{ClientConfig, OpenRouterClient};
//! # use gateway_core::ChatRequest;
//! # async fn example(client: &OpenRouterClient) -> gateway_core::GatewayResult<()> {
//! let mut stream = client
//!     .stream_chat(&ChatRequest::from_prompt("Describe a heron."))
//!     .await?;
//!
//! while let Some(chunk) = stream.next().await {
//!     let chunk = chunk?;
//!     if chunk.done {
//!         break;
//!     }
//!     print!("{}", chunk.delta);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod retry;
mod sse;
mod structured;

pub use client::OpenRouterClient;
pub use config::ClientConfig;
pub use retry::RetryPolicy;
pub use sse::{ChatStream, SseDecoder};
pub use structured::validate_structured;
