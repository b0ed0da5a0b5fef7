// tests/keyed_prerequisites.rs

use std::error::Error;
use std::sync::Arc;

use taskgraph::Workflow;
use taskgraph_test_utils::builders::{finishing_task, ExecutionLog};
use taskgraph_test_utils::init_tracing;
use taskgraph_test_utils::sync_pool::SyncWorkerPool;

type TestResult = Result<(), Box<dyn Error>>;

/// T requires keyed prerequisites "a" and "b". Its results must be reachable
/// by key, and a lookup for a key that was never provided returns `None`
/// rather than panicking.
#[test]
fn keyed_prerequisite_results_are_reachable_by_key() -> TestResult {
    init_tracing();

    let workflow = Workflow::with_pool("keyed", Arc::new(SyncWorkerPool::new()));
    let log = ExecutionLog::new();

    let a = finishing_task("A", &log);
    let b = finishing_task("B", &log);
    let t = finishing_task("T", &log);

    workflow.add_root_task(&a)?;
    workflow.add_root_task(&b)?;
    workflow.add_task(&t, [], [("a".to_string(), a.clone()), ("b".to_string(), b.clone())])?;

    workflow.start();

    let by_key = t.keyed_prerequisite_results();
    assert_eq!(by_key.len(), 2);
    assert_eq!(
        t.prerequisite_result_for_key("a")
            .and_then(|v| v.downcast::<String>().ok())
            .as_deref(),
        Some(&"A-ok".to_string())
    );
    assert_eq!(
        t.prerequisite_result_for_key("b")
            .and_then(|v| v.downcast::<String>().ok())
            .as_deref(),
        Some(&"B-ok".to_string())
    );
    assert!(t.prerequisite_result_for_key("c").is_none());
    assert!(!workflow.has_unfinished_tasks());

    Ok(())
}

/// A task whose `required_prerequisite_keys` are not fully satisfied by the
/// keyed prerequisites supplied to `add_task` must be rejected up front.
#[test]
fn missing_required_keys_are_rejected_at_add_time() -> TestResult {
    init_tracing();

    let workflow = Workflow::with_pool("keyed-missing", Arc::new(SyncWorkerPool::new()));
    let log = ExecutionLog::new();

    let a = finishing_task("A", &log);
    let t = taskgraph::Task::with_body(
        "T",
        ["a".to_string(), "b".to_string()],
        Arc::new(NoopBody),
    );

    workflow.add_root_task(&a)?;
    let result = workflow.add_task(&t, [], [("a".to_string(), a.clone())]);

    assert!(result.is_err());

    Ok(())
}

struct NoopBody;

impl taskgraph::TaskBody for NoopBody {
    fn run(&self, task: &taskgraph::Task) {
        task.finish(taskgraph::types::value(()));
    }
}
