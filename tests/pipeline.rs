// tests/pipeline.rs

use std::error::Error;
use std::sync::Arc;

use taskgraph::Workflow;
use taskgraph_test_utils::builders::{finishing_task, ExecutionLog};
use taskgraph_test_utils::sync_pool::SyncWorkerPool;
use taskgraph_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// A -> B -> C, each a closure that finishes with "<name>-ok". Dispatch
/// order must be A, then B, then C, and the workflow finishes exactly once.
#[test]
fn three_task_pipeline_runs_in_order_and_finishes_once() -> TestResult {
    init_tracing();

    let workflow = Workflow::with_pool("pipeline", Arc::new(SyncWorkerPool::new()));
    let log = ExecutionLog::new();

    let a = finishing_task("A", &log);
    let b = finishing_task("B", &log);
    let c = finishing_task("C", &log);

    workflow.add_root_task(&a)?;
    workflow.add_task(&b, [a.clone()], [])?;
    workflow.add_task(&c, [b.clone()], [])?;

    workflow.start();

    assert_eq!(log.snapshot(), vec!["A", "B", "C"]);
    assert_eq!(a.result::<String>().as_deref(), Some(&"A-ok".to_string()));
    assert_eq!(b.result::<String>().as_deref(), Some(&"B-ok".to_string()));
    assert_eq!(c.result::<String>().as_deref(), Some(&"C-ok".to_string()));
    assert!(!workflow.has_unfinished_tasks());
    assert!(!workflow.has_failed_tasks());

    Ok(())
}
