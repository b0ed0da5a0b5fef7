// src/pool/mod.rs

//! Bounded-concurrency execution of task bodies.
//!
//! Mirrors the split the teacher draws between a trait describing "a thing
//! that can run scheduled work" (there: `ExecutorBackend`; here:
//! [`WorkerPool`]) and a production implementation built on Tokio. Test code
//! substitutes a synchronous pool instead of spinning up real concurrency,
//! the same way the teacher substitutes a fake executor.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::warn;

/// A unit of work enqueued on a [`WorkerPool`]. Runs on whatever thread the
/// pool chooses; may block for as long as it needs to.
pub type BoxedWork = Box<dyn FnOnce() + Send>;

/// Abstraction over "run this task body somewhere, eventually."
///
/// Implementations must not run `work` synchronously on the calling thread
/// inside `enqueue` itself, a task's `start()` call should return promptly.
pub trait WorkerPool: Send + Sync {
    fn enqueue(&self, work: BoxedWork);
}

/// Default production pool: bounds concurrency with a semaphore and runs
/// each work item via `spawn_blocking`, since task bodies are not assumed to
/// cooperate with the async runtime.
pub struct TokioWorkerPool {
    semaphore: Arc<Semaphore>,
}

impl TokioWorkerPool {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency.max(1))),
        }
    }

    /// Size the pool to the host's available parallelism, falling back to a
    /// small constant if that can't be determined.
    pub fn with_default_concurrency() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(concurrency)
    }
}

impl Default for TokioWorkerPool {
    fn default() -> Self {
        Self::with_default_concurrency()
    }
}

impl WorkerPool for TokioWorkerPool {
    fn enqueue(&self, work: BoxedWork) {
        let semaphore = self.semaphore.clone();
        tokio::spawn(async move {
            let permit = semaphore.acquire_owned().await;
            let permit = match permit {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("worker pool semaphore closed; dropping scheduled work");
                    return;
                }
            };
            if let Err(err) = tokio::task::spawn_blocking(work).await {
                warn!(error = %err, "task body panicked");
            }
            drop(permit);
        });
    }
}
