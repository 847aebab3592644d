//! Response DTOs for the key-value service API
//!
//! Defines the structure of outgoing HTTP response bodies. Successful GETs
//! return the raw value bytes and have no DTO here.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for the PUT operation (PUT /kv/:key)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: i64,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: i64) -> Self {
        Self {
            message: format!("Key {} stored successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /kv/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: i64,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: i64) -> Self {
        Self {
            message: format!("Key {} deleted successfully", key),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries evicted
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(snapshot: StatsSnapshot) -> Self {
        Self {
            hit_rate: snapshot.hit_rate(),
            hits: snapshot.hits,
            misses: snapshot.misses,
            evictions: snapshot.evictions,
            total_entries: snapshot.total_entries,
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
