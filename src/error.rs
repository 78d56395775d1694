//! Error types for the cache server
//!
//! The cache itself never fails; these cover request validation at the HTTP
//! boundary and startup configuration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Gateway Error Enum ==
/// Errors surfaced by the HTTP front end.
///
/// A key that is absent or expired is not an error; fetch handlers answer it
/// with a `found: false` body instead.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Request body or parameters failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Config Error Enum ==
/// Configuration rejected at startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} {reason}")]
    OutOfRange {
        name: &'static str,
        reason: &'static str,
    },
}

// == Result Type Alias ==
/// Convenience Result type for gateway handlers.
pub type Result<T> = std::result::Result<T, GatewayError>;
