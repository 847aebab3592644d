//! Store Module
//!
//! Everything that talks to the durable backing store: the three-operation
//! table surface, the session pool, and the concrete backends.

use bytes::Bytes;
use thiserror::Error;

pub mod memory;
pub mod mysql;
pub mod pool;

pub use memory::MemoryBackend;
pub use mysql::MysqlBackend;
pub use pool::{ConnectionPool, PooledSession};

// == Store Error ==
/// Any failure reported by the backing store or its session.
///
/// The store layer deliberately does not classify further; callers get a
/// single category with the driver's message attached.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Convenience Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// == Backend ==
/// The table surface the rest of the service is written against: one
/// table of `(i64 key, byte-string value)` rows reached through sessions.
///
/// Sessions are opened eagerly at startup to fill the pool, then borrowed
/// exclusively for the duration of one call. Every operation completes
/// synchronously on the calling thread; blocking is expected and handled
/// by running these calls on executor workers.
pub trait Backend: Send + Sync + 'static {
    /// One open session against the store.
    type Session: Send + 'static;

    /// Opens a fresh session. Used to fill the pool at startup.
    fn open_session(&self) -> StoreResult<Self::Session>;

    /// Reads the value for `key`. A missing row is `Ok(None)`, not an
    /// error.
    fn select_value(&self, session: &mut Self::Session, key: i64) -> StoreResult<Option<Bytes>>;

    /// Inserts `key -> value`, overwriting any existing row.
    fn upsert(&self, session: &mut Self::Session, key: i64, value: &[u8]) -> StoreResult<()>;

    /// Deletes the row for `key`, returning how many rows were affected.
    fn delete(&self, session: &mut Self::Session, key: i64) -> StoreResult<u64>;
}
