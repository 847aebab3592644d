//! Connection Pool Module
//!
//! A fixed-size pool of pre-opened store sessions. Borrowers block until a
//! session is free; a dropped guard hands the session back and wakes one
//! waiter.

use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::store::StoreResult;

// == Connection Pool ==
/// A bounded set of idle sessions plus a wait queue.
///
/// At steady state `idle + borrowed` equals the configured capacity; a
/// session is either idle in the pool or exclusively borrowed, never both.
///
/// Sessions are never health-checked or replaced here: a broken session is
/// returned like any other, the backend surfaces the error on the call
/// that hit it, and the client re-establishes on next use.
pub struct ConnectionPool<S> {
    idle: Mutex<VecDeque<S>>,
    available: Condvar,
    capacity: usize,
}

impl<S> ConnectionPool<S> {
    // == Constructor ==
    /// Opens `capacity` sessions through `connect` (clamped to at least
    /// one). If any open fails, the sessions opened so far are closed in
    /// reverse order and the error is returned.
    pub fn open<F>(capacity: usize, mut connect: F) -> StoreResult<Self>
    where
        F: FnMut() -> StoreResult<S>,
    {
        let capacity = capacity.max(1);
        let mut sessions: VecDeque<S> = VecDeque::with_capacity(capacity);
        for _ in 0..capacity {
            match connect() {
                Ok(session) => sessions.push_back(session),
                Err(err) => {
                    while let Some(session) = sessions.pop_back() {
                        drop(session);
                    }
                    return Err(err);
                }
            }
        }
        Ok(Self {
            idle: Mutex::new(sessions),
            available: Condvar::new(),
            capacity,
        })
    }

    // == Acquire ==
    /// Borrows a session, blocking until one is idle.
    pub fn acquire(&self) -> PooledSession<'_, S> {
        let mut idle = self.idle.lock();
        while idle.is_empty() {
            self.available.wait(&mut idle);
        }
        let session = idle.pop_front().unwrap();
        PooledSession {
            pool: self,
            session: Some(session),
        }
    }

    // == Acquire with deadline ==
    /// Borrows a session, giving up after `timeout`. `None` means the
    /// pool stayed exhausted for the whole wait.
    pub fn acquire_timeout(&self, timeout: Duration) -> Option<PooledSession<'_, S>> {
        let deadline = Instant::now() + timeout;
        let mut idle = self.idle.lock();
        while idle.is_empty() {
            if self.available.wait_until(&mut idle, deadline).timed_out() && idle.is_empty() {
                return None;
            }
        }
        let session = idle.pop_front().unwrap();
        Some(PooledSession {
            pool: self,
            session: Some(session),
        })
    }

    // == Accessors ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sessions currently sitting idle in the pool.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, session: S) {
        self.idle.lock().push_back(session);
        self.available.notify_one();
    }
}

// == Pooled Session ==
/// A borrowed session. Dropping the guard returns the session to the pool
/// and wakes one waiter.
pub struct PooledSession<'a, S> {
    pool: &'a ConnectionPool<S>,
    session: Option<S>,
}

impl<S> Deref for PooledSession<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.session.as_ref().unwrap()
    }
}

impl<S> DerefMut for PooledSession<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.session.as_mut().unwrap()
    }
}

impl<S> Drop for PooledSession<'_, S> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.pool.release(session);
        }
    }
}
