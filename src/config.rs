//! Configuration Module
//!
//! Handles loading and managing service configuration from environment
//! variables. All parameters are bound at startup; there is no dynamic
//! reconfiguration.

use std::env;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database host
    pub db_host: String,
    /// Database port
    pub db_port: u16,
    /// Database user
    pub db_user: String,
    /// Database password
    pub db_password: String,
    /// Database schema name
    pub db_name: String,
    /// Key-value table name
    pub db_table: String,
    /// Total cache capacity in entries, spread over the shards
    pub cache_capacity: usize,
    /// Number of cache shards
    pub cache_shards: usize,
    /// Number of pooled database sessions
    pub pool_size: usize,
    /// Number of worker threads for blocking store calls
    pub worker_threads: usize,
    /// HTTP server port
    pub server_port: u16,
    /// How long a request may wait for a database session, in milliseconds
    pub acquire_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DB_HOST` - Database host (default: 127.0.0.1)
    /// - `DB_PORT` - Database port (default: 3306)
    /// - `DB_USER` - Database user (default: kvuser)
    /// - `DB_PASSWORD` - Database password (default: empty)
    /// - `DB_NAME` - Database schema (default: kvstore)
    /// - `DB_TABLE` - Key-value table (default: kv)
    /// - `CACHE_CAPACITY` - Total cache entries (default: 10000)
    /// - `CACHE_SHARDS` - Cache shard count (default: 16)
    /// - `POOL_SIZE` - Database session pool size (default: 8)
    /// - `WORKER_THREADS` - Blocking worker count (default: 8)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `ACQUIRE_TIMEOUT_MS` - Session wait deadline (default: 1000)
    pub fn from_env() -> Self {
        Self {
            db_host: env::var("DB_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            db_port: env::var("DB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3306),
            db_user: env::var("DB_USER").unwrap_or_else(|_| "kvuser".to_string()),
            db_password: env::var("DB_PASSWORD").unwrap_or_default(),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| "kvstore".to_string()),
            db_table: env::var("DB_TABLE").unwrap_or_else(|_| "kv".to_string()),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cache_shards: env::var("CACHE_SHARDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(16),
            pool_size: env::var("POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            worker_threads: env::var("WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            acquire_timeout_ms: env::var("ACQUIRE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_host: "127.0.0.1".to_string(),
            db_port: 3306,
            db_user: "kvuser".to_string(),
            db_password: String::new(),
            db_name: "kvstore".to_string(),
            db_table: "kv".to_string(),
            cache_capacity: 10_000,
            cache_shards: 16,
            pool_size: 8,
            worker_threads: 8,
            server_port: 8080,
            acquire_timeout_ms: 1000,
        }
    }
}
