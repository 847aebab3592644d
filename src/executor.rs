//! Work Executor Module
//!
//! A fixed pool of OS worker threads draining one FIFO queue. Blocking
//! store calls run here so request handlers stay responsive; results come
//! back through one-shot channels the async side can await.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::warn;

// == Executor Error ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The executor is shut down; new work is refused.
    #[error("executor is shut down")]
    Shutdown,
    /// The result channel closed before the task published a value.
    #[error("task result was lost")]
    Lost,
}

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Queue {
    jobs: VecDeque<Job>,
    stopped: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    work_ready: Condvar,
}

// == Work Executor ==
/// Fixed worker pool with a single FIFO task queue.
///
/// Tasks are not cancellable: a submitted task runs to completion even if
/// the caller abandons its handle, and its side effects still land.
/// Deadlines belong to the layer above, which simply stops waiting.
pub struct WorkExecutor {
    shared: Arc<Shared>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkExecutor {
    // == Constructor ==
    /// Spawns `workers` threads (clamped to at least one).
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::new(),
                stopped: false,
            }),
            work_ready: Condvar::new(),
        });

        let handles = (0..workers)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("kv-worker-{i}"))
                    .spawn(move || worker_loop(&shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Self {
            shared,
            workers: Mutex::new(handles),
        }
    }

    // == Submit ==
    /// Enqueues `job` and returns a handle that resolves to its return
    /// value. Fails only after shutdown.
    pub fn submit<T, F>(&self, job: F) -> Result<JobHandle<T>, ExecutorError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        {
            let mut queue = self.shared.queue.lock();
            if queue.stopped {
                return Err(ExecutorError::Shutdown);
            }
            queue.jobs.push_back(Box::new(move || {
                // the receiver may be gone; the work still happened
                let _ = tx.send(job());
            }));
        }
        self.shared.work_ready.notify_one();
        Ok(JobHandle { rx })
    }

    // == Shutdown ==
    /// Stops accepting work, lets the workers drain the queue, and joins
    /// them. Idempotent.
    pub fn shutdown(&self) {
        {
            let mut queue = self.shared.queue.lock();
            if queue.stopped {
                return;
            }
            queue.stopped = true;
        }
        self.shared.work_ready.notify_all();

        let handles: Vec<_> = self.workers.lock().drain(..).collect();
        for handle in handles {
            if handle.join().is_err() {
                warn!("worker thread panicked during shutdown");
            }
        }
    }
}

impl Drop for WorkExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(job) = queue.jobs.pop_front() {
                    break job;
                }
                if queue.stopped {
                    return;
                }
                shared.work_ready.wait(&mut queue);
            }
        };

        // a panicking task must not take the worker down with it
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            warn!("task panicked on worker thread");
        }
    }
}

// == Job Handle ==
/// The submitter's end of a task: single-producer, single-consumer.
#[derive(Debug)]
pub struct JobHandle<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> JobHandle<T> {
    /// Waits for the task to publish its result.
    pub async fn join(self) -> Result<T, ExecutorError> {
        self.rx.await.map_err(|_| ExecutorError::Lost)
    }
}
