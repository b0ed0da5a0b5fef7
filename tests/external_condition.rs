// tests/external_condition.rs

use std::error::Error;
use std::sync::Arc;

use taskgraph::types::value;
use taskgraph::{ConditionTask, Workflow};
use taskgraph_test_utils::builders::{finishing_task, ExecutionLog};
use taskgraph_test_utils::init_tracing;
use taskgraph_test_utils::sync_pool::SyncWorkerPool;

type TestResult = Result<(), Box<dyn Error>>;

/// A root condition task C gates a downstream closure task X. Starting the
/// workflow before C is fulfilled fails C and leaves X pending; fulfilling C
/// from outside must re-drive C to Finished and unblock X.
#[test]
fn fulfilling_a_condition_unblocks_its_dependents() -> TestResult {
    init_tracing();

    let workflow = Workflow::with_pool("condition", Arc::new(SyncWorkerPool::new()));
    let log = ExecutionLog::new();

    let condition = ConditionTask::new("C");
    let c = condition.task().clone();
    let x = finishing_task("X", &log);

    workflow.add_root_task(&c)?;
    workflow.add_task(&x, [c.clone()], [])?;

    workflow.start();

    assert!(c.is_failed());
    assert!(c.error().is_some());
    assert!(x.is_pending());
    assert!(log.snapshot().is_empty());

    condition.fulfill(value("external-signal".to_string()));

    assert!(c.is_finished());
    assert_eq!(
        c.result::<String>().as_deref(),
        Some(&"external-signal".to_string())
    );
    assert!(x.is_finished());
    assert_eq!(log.snapshot(), vec!["X"]);
    assert!(!workflow.has_unfinished_tasks());
    assert!(!workflow.has_failed_tasks());

    Ok(())
}
