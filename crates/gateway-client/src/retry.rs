//! Retry policy with exponential backoff.
//!
//! Both call paths share this layer: it applies to the outbound HTTP attempt
//! only, before any bytes of a streaming body are consumed.

use gateway_core::GatewayError;
use std::time::Duration;

/// Backoff multiplier between successive retries.
const BACKOFF_MULTIPLIER: u32 = 3;

/// Error-description markers that classify a transport failure as transient.
const TRANSIENT_MARKERS: &[&str] = &[
    "connection reset",
    "connection refused",
    "connection closed",
    "dns error",
    "broken pipe",
    "timed out",
];

/// Retry policy: a budget plus an exponential backoff schedule.
///
/// With the default base delay of 500ms the schedule is 500ms, 1500ms,
/// 4500ms for successive retries. A `Retry-After` header on the failed
/// response overrides the computed delay for the next attempt only.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given budget and backoff base delay.
    #[must_use]
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// The maximum number of retries after the first attempt.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// The computed backoff delay before retry number `attempt` (0-indexed).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * BACKOFF_MULTIPLIER.pow(attempt)
    }

    /// The delay before the next attempt: the `Retry-After` value when the
    /// response carried one, the computed backoff otherwise.
    #[must_use]
    pub fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }

    /// Whether another attempt is allowed for a retryable failure.
    #[must_use]
    pub fn allows_retry(&self, attempt: u32, error: &GatewayError) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }
}

/// Whether a transport error description carries a known transient-failure
/// marker.
#[must_use]
pub(crate) fn is_transient_description(description: &str) -> bool {
    let lower = description.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| lower.contains(marker))
}
