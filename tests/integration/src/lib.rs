//! Integration tests for the Nature Log AI gateway
//!
//! This crate covers:
//! - Gateway client retry, backoff and timeout behavior against a mock
//!   provider
//! - Streaming decode behavior over real HTTP responses
//! - Route-handler behavior including error sanitization

pub mod mock_openrouter;

pub use helpers::*;
pub use mock_openrouter::*;

#[cfg(test)]
mod api_tests;
#[cfg(test)]
mod streaming_tests;
