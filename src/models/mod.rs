//! Response models for the key-value service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing HTTP response bodies. Values travel as raw bytes in both
//! directions, so there are no request DTOs.

pub mod responses;

// Re-export commonly used types
pub use responses::{DeleteResponse, HealthResponse, PutResponse, StatsResponse};
