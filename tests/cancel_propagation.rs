// tests/cancel_propagation.rs

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use taskgraph::notify::{EventKind, Notification, Subject};
use taskgraph::types::value;
use taskgraph::{Task, Workflow};
use taskgraph_test_utils::builders::{finishing_task, ExecutionLog};
use taskgraph_test_utils::init_tracing;
use taskgraph_test_utils::sync_pool::SyncWorkerPool;

type TestResult = Result<(), Box<dyn Error>>;

/// R -> M -> L. R's body cancels the whole workflow mid-execution (a stand-in
/// for "while R.Executing"), then attempts to finish anyway. The finish must
/// be dropped, M and L must both end up Cancelled, WorkflowDidFinish must
/// never fire, and WorkflowTaskDidCancel must fire once per task.
#[test]
fn cancel_propagates_and_suppresses_finish_and_completion() -> TestResult {
    init_tracing();

    let workflow = Workflow::with_pool("cancel", Arc::new(SyncWorkerPool::new()));
    let log = ExecutionLog::new();

    let workflow_for_root = workflow.clone();
    let root = Task::closure("R", move |task| {
        workflow_for_root.cancel();
        // Advisory cancellation: the body keeps running and may still try
        // to finish, but the late call must be ignored.
        task.finish(value("R-ok".to_string()));
    });
    let middle = finishing_task("M", &log);
    let leaf = finishing_task("L", &log);

    workflow.add_root_task(&root)?;
    workflow.add_task(&middle, [root.clone()], [])?;
    workflow.add_task(&leaf, [middle.clone()], [])?;

    let did_finish = Arc::new(AtomicBool::new(false));
    let did_finish_flag = did_finish.clone();
    let _finish_sub = workflow.bus().subscribe(
        Subject::Workflow(workflow.id()),
        EventKind::WorkflowDidFinish,
        move |_: &Notification| did_finish_flag.store(true, Ordering::SeqCst),
    );

    let cancelled_tasks = Arc::new(Mutex::new(Vec::new()));
    let cancelled_tasks_recorder = cancelled_tasks.clone();
    let _cancel_sub = workflow.bus().subscribe(
        Subject::Workflow(workflow.id()),
        EventKind::WorkflowTaskDidCancel,
        move |note: &Notification| {
            if let Some(id) = note.task {
                cancelled_tasks_recorder.lock().unwrap().push(id);
            }
        },
    );

    workflow.start();

    assert!(root.is_cancelled(), "root's late finish must be dropped");
    assert!(middle.is_cancelled());
    assert!(leaf.is_cancelled());
    assert!(!did_finish.load(Ordering::SeqCst));
    assert_eq!(cancelled_tasks.lock().unwrap().len(), 3);
    assert!(log.snapshot().is_empty(), "M and L bodies must never run");

    Ok(())
}
