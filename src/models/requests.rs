//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for the store operation (POST/PUT /set)
///
/// `value` is any JSON document and is stored as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The document to store
    pub value: Value,
}

/// Query string for the fetch operation (GET /get?key=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchQuery {
    pub key: Option<String>,
}

/// Checks that a key is non-empty and within [`MAX_KEY_LENGTH`].
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
