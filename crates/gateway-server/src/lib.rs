//! # Gateway Server
//!
//! HTTP adapter for the Nature Log AI gateway.
//!
//! This crate provides:
//! - Axum route handlers for buffered and streaming chat
//! - Health endpoints
//! - Error sanitization between the gateway client and end users
//! - Graceful shutdown handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use routes::create_router;
pub use server::{Server, ServerConfig, ServerError};
pub use state::AppState;
