//! API Module
//!
//! HTTP handlers and routing for the key-value REST API.
//!
//! # Endpoints
//! - `GET /kv/:key` - Retrieve a value by key (raw bytes)
//! - `PUT /kv/:key` - Store a value; the request body is the value
//! - `DELETE /kv/:key` - Delete a key
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
