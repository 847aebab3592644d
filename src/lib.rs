//! kvserved - a cached key-value HTTP service
//!
//! Serves per-key reads, writes, and deletes over HTTP with a sharded
//! in-memory LRU cache in front of a MySQL table. Blocking store work
//! runs on a dedicated worker pool over a bounded session pool.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod service;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use error::KvError;
pub use service::KvService;
