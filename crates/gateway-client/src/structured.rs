//! Structured-output validation.

use gateway_core::{GatewayError, GatewayResult};
use serde::de::DeserializeOwned;

/// Parse `content` as JSON, validate it against `schema`, and deserialize
/// the validated value.
///
/// Pure: no network I/O and no retries. Malformed JSON fails with a parse
/// error; a conformant-JSON/non-conformant-schema value fails with a
/// validation error carrying one entry per violation.
///
/// # Errors
/// - [`GatewayError::Parse`] when `content` is not valid JSON, or the
///   validated value does not deserialize into `T`.
/// - [`GatewayError::Validation`] when the value violates `schema`.
/// - [`GatewayError::Configuration`] when `schema` itself is not a valid
///   JSON Schema.
pub fn validate_structured<T: DeserializeOwned>(
    content: &str,
    schema: &serde_json::Value,
) -> GatewayResult<T> {
    let parsed: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| GatewayError::parse(format!("response is not valid JSON: {e}")))?;

    let validator = jsonschema::validator_for(schema)
        .map_err(|e| GatewayError::configuration(format!("invalid JSON schema: {e}")))?;

    let violations: Vec<String> = validator
        .iter_errors(&parsed)
        .map(|error| format!("{}: {error}", error.instance_path()))
        .collect();

    if !violations.is_empty() {
        return Err(GatewayError::validation(violations));
    }

    serde_json::from_value(parsed)
        .map_err(|e| GatewayError::parse(format!("validated value failed to deserialize: {e}")))
}
