//! API Handlers
//!
//! HTTP request handlers for each endpoint. Handlers are generic over the
//! store backend so the same router serves MySQL in production and the
//! in-memory backend in tests.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{KvError, Result};
use crate::models::{DeleteResponse, HealthResponse, PutResponse, StatsResponse};
use crate::service::KvService;
use crate::store::Backend;

/// Application state shared across all handlers.
pub struct AppState<B: Backend> {
    /// The request coordinator
    pub service: Arc<KvService<B>>,
}

impl<B: Backend> AppState<B> {
    /// Creates a new AppState owning the given service.
    pub fn new(service: KvService<B>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// derived Clone would demand B: Clone; only the Arc is cloned here
impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Parses the path segment into a key, rejecting anything that is not a
/// signed 64-bit integer.
fn parse_key(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| KvError::BadRequest(format!("key must be a signed 64-bit integer, got {raw:?}")))
}

/// Handler for GET /kv/:key
///
/// Returns the raw value bytes, from cache when possible.
pub async fn get_handler<B: Backend>(
    State(state): State<AppState<B>>,
    Path(key): Path<String>,
) -> Result<Response> {
    let key = parse_key(&key)?;
    match state.service.get(key).await? {
        Some(value) => Ok((
            [(header::CONTENT_TYPE, "application/octet-stream")],
            value,
        )
            .into_response()),
        None => Err(KvError::NotFound),
    }
}

/// Handler for PUT /kv/:key
///
/// The request body is the value, verbatim. An empty body stores an empty
/// value.
pub async fn put_handler<B: Backend>(
    State(state): State<AppState<B>>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<PutResponse>> {
    let key = parse_key(&key)?;
    state.service.put(key, body).await?;
    Ok(Json(PutResponse::new(key)))
}

/// Handler for DELETE /kv/:key
///
/// Reports not-found when the store had no row for the key.
pub async fn delete_handler<B: Backend>(
    State(state): State<AppState<B>>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let key = parse_key(&key)?;
    if state.service.delete(key).await? {
        Ok(Json(DeleteResponse::new(key)))
    } else {
        Err(KvError::NotFound)
    }
}

/// Handler for GET /stats
pub async fn stats_handler<B: Backend>(State(state): State<AppState<B>>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.service.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryBackend;

    fn test_state() -> AppState<MemoryBackend> {
        let config = Config {
            cache_capacity: 64,
            cache_shards: 4,
            pool_size: 2,
            worker_threads: 2,
            ..Config::default()
        };
        AppState::new(KvService::new(MemoryBackend::new(), &config).unwrap())
    }

    #[test]
    fn test_parse_key_accepts_integers() {
        assert_eq!(parse_key("42").unwrap(), 42);
        assert_eq!(parse_key("-7").unwrap(), -7);
    }

    #[test]
    fn test_parse_key_rejects_garbage() {
        assert!(parse_key("abc").is_err());
        assert!(parse_key("").is_err());
        assert!(parse_key("1.5").is_err());
        // one past i64::MAX
        assert!(parse_key("9223372036854775808").is_err());
    }

    #[tokio::test]
    async fn test_put_then_get_handler() {
        let state = test_state();

        let put = put_handler(
            State(state.clone()),
            Path("5".to_string()),
            Bytes::from_static(b"hello"),
        )
        .await;
        assert!(put.is_ok());

        let get = get_handler(State(state), Path("5".to_string())).await;
        assert!(get.is_ok());
    }

    #[tokio::test]
    async fn test_get_handler_missing_key() {
        let state = test_state();
        let result = get_handler(State(state), Path("404".to_string())).await;
        assert!(matches!(result, Err(KvError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_handler_missing_key() {
        let state = test_state();
        let result = delete_handler(State(state), Path("404".to_string())).await;
        assert!(matches!(result, Err(KvError::NotFound)));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
