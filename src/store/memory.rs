//! In-Memory Backend Module
//!
//! A process-local implementation of the table surface. Sessions share one
//! map, so the backend behaves like a single store reached from many
//! connections. Tests lean on the failure injection hook.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use crate::store::{Backend, StoreError, StoreResult};

#[derive(Default)]
struct State {
    rows: Mutex<BTreeMap<i64, Bytes>>,
    /// When set, the next operation of any kind fails with this message.
    fail_next: Mutex<Option<String>>,
}

impl State {
    fn check_injected_failure(&self) -> StoreResult<()> {
        match self.fail_next.lock().take() {
            Some(message) => Err(StoreError(message)),
            None => Ok(()),
        }
    }
}

// == Memory Backend ==
/// An in-memory table. Cloning the backend shares the underlying rows,
/// which lets tests keep a handle for seeding and inspection while the
/// service owns its own copy.
#[derive(Default)]
pub struct MemoryBackend {
    state: Arc<State>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arranges for the next operation (of any kind) to fail with
    /// `message`.
    pub fn fail_next(&self, message: &str) {
        *self.state.fail_next.lock() = Some(message.to_string());
    }

    /// Seeds a row directly, bypassing the session path.
    pub fn insert_row(&self, key: i64, value: impl Into<Bytes>) {
        self.state.rows.lock().insert(key, value.into());
    }

    /// Reads a row directly, bypassing the session path.
    pub fn row(&self, key: i64) -> Option<Bytes> {
        self.state.rows.lock().get(&key).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.state.rows.lock().len()
    }
}

impl Clone for MemoryBackend {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

// == Memory Session ==
/// A handle onto the shared map; exists so the pool has something real to
/// lend out.
pub struct MemorySession {
    state: Arc<State>,
}

impl Backend for MemoryBackend {
    type Session = MemorySession;

    fn open_session(&self) -> StoreResult<MemorySession> {
        Ok(MemorySession {
            state: Arc::clone(&self.state),
        })
    }

    fn select_value(&self, session: &mut MemorySession, key: i64) -> StoreResult<Option<Bytes>> {
        session.state.check_injected_failure()?;
        Ok(session.state.rows.lock().get(&key).cloned())
    }

    fn upsert(&self, session: &mut MemorySession, key: i64, value: &[u8]) -> StoreResult<()> {
        session.state.check_injected_failure()?;
        session
            .state
            .rows
            .lock()
            .insert(key, Bytes::copy_from_slice(value));
        Ok(())
    }

    fn delete(&self, session: &mut MemorySession, key: i64) -> StoreResult<u64> {
        session.state.check_injected_failure()?;
        let removed = session.state.rows.lock().remove(&key).is_some();
        Ok(u64::from(removed))
    }
}
