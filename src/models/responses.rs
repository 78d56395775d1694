//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for the store operation (POST/PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub status: &'static str,
    /// The key that was stored
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            status: "ok",
            key: key.into(),
        }
    }
}

/// Response body for the fetch operation (GET /get)
///
/// `value` is omitted when `found` is false.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    pub found: bool,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FetchResponse {
    pub fn found(key: impl Into<String>, value: Value) -> Self {
        Self {
            found: true,
            key: key.into(),
            value: Some(value),
        }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self {
            found: false,
            key: key.into(),
            value: None,
        }
    }
}

/// Response body for the delete operation (DELETE /del/:key)
///
/// Sent whether or not the key existed.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            status: "ok",
            key: key.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
///
/// The store counters are emitted inline alongside the derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub capacity: usize,
    pub ttl_secs: u64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, capacity: usize, ttl_secs: u64) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            capacity,
            ttl_secs,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
