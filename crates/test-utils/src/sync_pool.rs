use taskgraph::pool::{BoxedWork, WorkerPool};

/// A [`WorkerPool`] that runs each work item synchronously on the calling
/// thread, in the order it is enqueued.
///
/// Swapped in for [`taskgraph::TokioWorkerPool`] in tests so that assertions
/// about notification/delegate ordering don't race against real
/// concurrency, the same way the teacher substitutes a fake executor
/// backend for its real Tokio-process one.
#[derive(Default)]
pub struct SyncWorkerPool;

impl SyncWorkerPool {
    pub fn new() -> Self {
        Self
    }
}

impl WorkerPool for SyncWorkerPool {
    fn enqueue(&self, work: BoxedWork) {
        work();
    }
}
