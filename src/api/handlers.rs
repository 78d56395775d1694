//! API Handlers
//!
//! HTTP request handlers translating requests into cache operations.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::CacheStore;
use crate::config::CacheConfig;
use crate::error::{GatewayError, Result};
use crate::models::{
    validate_key, DeleteResponse, FetchQuery, FetchResponse, HealthResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The store locks internally, so handlers share it through a plain `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheStore>,
}

impl AppState {
    /// Wraps an already-shared store.
    pub fn new(cache: Arc<CacheStore>) -> Self {
        Self { cache }
    }

    /// Builds a fresh store from the given configuration.
    pub fn from_config(config: CacheConfig) -> Self {
        Self::new(Arc::new(CacheStore::new(config)))
    }
}

/// Handler for POST /set and PUT /set
///
/// Stores a document under a key. The cache never rejects a write; only
/// malformed keys are refused here.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    check_key(&req.key)?;

    state.cache.set(req.key.clone(), req.value);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<(StatusCode, Json<FetchResponse>)> {
    check_key(&key)?;
    Ok(fetch(&state, key))
}

/// Handler for GET /get?key=...
pub async fn get_query_handler(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<(StatusCode, Json<FetchResponse>)> {
    let key = query
        .key
        .ok_or_else(|| GatewayError::InvalidRequest("Missing 'key' query parameter".to_string()))?;
    check_key(&key)?;
    Ok(fetch(&state, key))
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(error_msg) => Err(GatewayError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Maps presence to 200 and absence (missing or expired) to 404.
fn fetch(state: &AppState, key: String) -> (StatusCode, Json<FetchResponse>) {
    match state.cache.get(&key) {
        Some(value) => (StatusCode::OK, Json(FetchResponse::found(key, value))),
        None => (StatusCode::NOT_FOUND, Json(FetchResponse::not_found(key))),
    }
}

/// Handler for DELETE /del/:key
///
/// Always succeeds; deleting an absent key is a no-op.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    check_key(&key)?;
    state.cache.delete(&key);
    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.cache.stats(),
        state.cache.capacity(),
        state.cache.ttl().as_secs(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
