//! Error types for the key-value service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::executor::ExecutorError;
use crate::store::StoreError;

// == KV Error Enum ==
/// Unified error type for the key-value service.
#[derive(Error, Debug)]
pub enum KvError {
    /// Key not present in the store
    #[error("key not found")]
    NotFound,

    /// Malformed key or parameter
    #[error("invalid request: {0}")]
    BadRequest(String),

    /// The backing store or its session failed
    #[error("database error: {0}")]
    Store(String),

    /// No store session became available within the request deadline
    #[error("no database session available within the deadline")]
    Busy,

    /// The service is tearing down; new requests are refused
    #[error("service is shutting down")]
    Shutdown,
}

impl From<StoreError> for KvError {
    fn from(err: StoreError) -> Self {
        KvError::Store(err.0)
    }
}

impl From<ExecutorError> for KvError {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Shutdown => KvError::Shutdown,
            ExecutorError::Lost => KvError::Store("task result was lost".to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for KvError {
    fn into_response(self) -> Response {
        let status = match &self {
            KvError::NotFound => StatusCode::NOT_FOUND,
            KvError::BadRequest(_) => StatusCode::BAD_REQUEST,
            KvError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            KvError::Busy | KvError::Shutdown => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the key-value service.
pub type Result<T> = std::result::Result<T, KvError>;
