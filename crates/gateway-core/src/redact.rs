//! Credential redaction for diagnostic output.
//!
//! Any diagnostic dump of configuration or request state must pass through
//! [`redact_value`] before being logged: fields whose key looks
//! credential-shaped are masked, recursively through nested structures.

/// Keys containing any of these markers (case-insensitive) are masked.
const SENSITIVE_MARKERS: &[&str] = &["key", "token", "secret", "password", "authorization"];

/// Placeholder written over masked values.
const REDACTED: &str = "[REDACTED]";

/// Return a copy of `value` with credential-shaped fields masked.
///
/// A field is credential-shaped when its key contains `key`, `token`,
/// `secret`, `password`, or `authorization`, case-insensitively. Matching is
/// applied recursively through objects and arrays.
#[must_use]
pub fn redact_value(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::with_capacity(map.len());
            for (key, val) in map {
                if is_sensitive_key(key) {
                    redacted.insert(key.clone(), serde_json::Value::String(REDACTED.into()));
                } else {
                    redacted.insert(key.clone(), redact_value(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(redact_value).collect())
        }
        other => other.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| lower.contains(marker))
}
