// tests/failure_propagation.rs

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use taskgraph::types::value;
use taskgraph::{Task, Workflow};
use taskgraph_test_utils::builders::{finishing_task, ExecutionLog, TestFailure};
use taskgraph_test_utils::init_tracing;
use taskgraph_test_utils::sync_pool::SyncWorkerPool;

type TestResult = Result<(), Box<dyn Error>>;

/// A task that fails the first time it runs and succeeds on every
/// subsequent run, for exercising workflow-level retry.
fn flaky_task(name: &str, log: &ExecutionLog) -> Task {
    let name_owned = name.to_string();
    let log = log.clone();
    let has_run_once = Arc::new(AtomicBool::new(false));
    Task::closure(name, move |task| {
        log.record(&name_owned);
        if has_run_once.swap(true, Ordering::SeqCst) {
            task.finish(value(format!("{name_owned}-ok")));
        } else {
            task.fail(Arc::new(TestFailure("boom".into())));
        }
    })
}

/// A (finishes) -> B (fails first, then succeeds) -> C. C must remain
/// Pending while B is Failed, the workflow must report failed/unfinished
/// tasks and never fire WorkflowDidFinish, and a workflow-level retry that
/// this time succeeds must let C run to completion.
#[test]
fn middle_task_failure_blocks_downstream_until_retry() -> TestResult {
    init_tracing();

    let workflow = Workflow::with_pool("failure", Arc::new(SyncWorkerPool::new()));
    let log = ExecutionLog::new();

    let a = finishing_task("A", &log);
    let b = flaky_task("B", &log);
    let c = finishing_task("C", &log);

    workflow.add_root_task(&a)?;
    workflow.add_task(&b, [a.clone()], [])?;
    workflow.add_task(&c, [b.clone()], [])?;

    workflow.start();

    assert!(a.is_finished());
    assert!(b.is_failed());
    assert!(c.is_pending());
    assert!(workflow.has_failed_tasks());
    assert!(workflow.has_unfinished_tasks());

    workflow.retry();

    assert!(b.is_finished());
    assert!(c.is_finished());
    assert!(!workflow.has_failed_tasks());
    assert!(!workflow.has_unfinished_tasks());

    Ok(())
}
