//! # Gateway Telemetry
//!
//! Logging initialization for the Nature Log AI gateway.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod logging;

pub use logging::{init_logging, LoggingConfig, TelemetryError};
