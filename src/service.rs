//! Service Module
//!
//! The per-request logic tying the cache, the executor, the session pool,
//! and the table surface together. Handlers call into [`KvService`]; the
//! HTTP layer never touches the store directly.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::cache::{ShardedCache, StatsSnapshot};
use crate::config::Config;
use crate::error::KvError;
use crate::executor::WorkExecutor;
use crate::store::{Backend, ConnectionPool, StoreResult};

// == KV Service ==
/// Coordinates one GET/PUT/DELETE at a time against the cache and the
/// store.
///
/// The coherence contract: the cache is populated or invalidated only
/// after the store reports success. Failed store calls leave the cache
/// untouched, and a not-found read is never cached.
pub struct KvService<B: Backend> {
    cache: ShardedCache,
    backend: Arc<B>,
    pool: Arc<ConnectionPool<B::Session>>,
    executor: WorkExecutor,
    acquire_deadline: Duration,
}

impl<B: Backend> KvService<B> {
    // == Constructor ==
    /// Opens the session pool eagerly and spins up the worker pool.
    /// Fails if any session cannot be opened.
    pub fn new(backend: B, config: &Config) -> Result<Self, KvError> {
        let backend = Arc::new(backend);
        let pool = ConnectionPool::open(config.pool_size, || backend.open_session())?;

        Ok(Self {
            cache: ShardedCache::new(config.cache_capacity, config.cache_shards),
            backend,
            pool: Arc::new(pool),
            executor: WorkExecutor::new(config.worker_threads),
            acquire_deadline: Duration::from_millis(config.acquire_timeout_ms),
        })
    }

    // == Get ==
    /// Returns the value for `key`, from cache when possible, otherwise
    /// from the store. A store hit fills the cache; a store miss does not
    /// (no negative caching).
    pub async fn get(&self, key: i64) -> Result<Option<Bytes>, KvError> {
        if let Some(value) = self.cache.lookup(key) {
            debug!(key, "cache hit");
            return Ok(Some(value));
        }

        let found = self
            .dispatch(move |backend, session| backend.select_value(session, key))
            .await?;

        match found {
            Some(value) => {
                self.cache.insert(key, value.clone());
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    // == Put ==
    /// Writes `key -> value` to the store, then mirrors it into the
    /// cache. A failed store write leaves the cache untouched.
    pub async fn put(&self, key: i64, value: Bytes) -> Result<(), KvError> {
        let stored = value.clone();
        self.dispatch(move |backend, session| backend.upsert(session, key, &stored))
            .await?;

        self.cache.insert(key, value);
        Ok(())
    }

    // == Delete ==
    /// Deletes `key` from the store. Returns whether a row was actually
    /// removed; only then is the cache entry dropped. When the store had
    /// no such row the cache is left alone.
    pub async fn delete(&self, key: i64) -> Result<bool, KvError> {
        let rows = self
            .dispatch(move |backend, session| backend.delete(session, key))
            .await?;

        if rows > 0 {
            self.cache.remove(key);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // == Stats ==
    pub fn stats(&self) -> StatsSnapshot {
        self.cache.stats()
    }

    // == Shutdown ==
    /// Drains and joins the worker pool. Requests that still need store
    /// work afterwards are refused with a shutdown error; cached reads
    /// keep working.
    pub fn shutdown(&self) {
        self.executor.shutdown();
    }

    // == Dispatch ==
    /// Runs one store operation on a worker thread: borrow a session
    /// (bounded by the request deadline), run the operation, publish the
    /// outcome. The await here is the only suspension point.
    async fn dispatch<T, F>(&self, op: F) -> Result<T, KvError>
    where
        T: Send + 'static,
        F: FnOnce(&B, &mut B::Session) -> StoreResult<T> + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let pool = Arc::clone(&self.pool);
        let deadline = self.acquire_deadline;

        let handle = self.executor.submit(move || -> Result<T, KvError> {
            let mut session = pool.acquire_timeout(deadline).ok_or(KvError::Busy)?;
            op(&*backend, &mut *session).map_err(KvError::from)
        })?;

        handle.join().await?
    }
}
