// tests/properties.rs

use std::sync::Arc;

use proptest::prelude::*;

use taskgraph::Workflow;
use taskgraph_test_utils::builders::{finishing_task, ExecutionLog};
use taskgraph_test_utils::sync_pool::SyncWorkerPool;

/// Build a linear chain of `len` finishing tasks, A0 -> A1 -> ... -> A(len-1),
/// and return the tasks in order alongside the log they write to.
fn build_chain(workflow: &Workflow, len: usize, log: &ExecutionLog) -> Vec<taskgraph::Task> {
    let mut tasks = Vec::with_capacity(len);
    for i in 0..len {
        let name = format!("T{i}");
        let task = finishing_task(&name, log);
        if i == 0 {
            workflow.add_root_task(&task).unwrap();
        } else {
            workflow
                .add_task(&task, [tasks[i - 1].clone()], [])
                .unwrap();
        }
        tasks.push(task);
    }
    tasks
}

proptest! {
    /// A linear chain of tasks that all succeed must run strictly in
    /// dependency order and leave the workflow with no unfinished or failed
    /// tasks, regardless of the chain's length.
    #[test]
    fn chain_of_successes_runs_in_order_and_completes(len in 1usize..12) {
        let workflow = Workflow::with_pool("chain", Arc::new(SyncWorkerPool::new()));
        let log = ExecutionLog::new();
        let tasks = build_chain(&workflow, len, &log);

        workflow.start();

        let expected: Vec<String> = (0..len).map(|i| format!("T{i}")).collect();
        prop_assert_eq!(log.snapshot(), expected);
        prop_assert!(!workflow.has_unfinished_tasks());
        prop_assert!(!workflow.has_failed_tasks());
        for task in &tasks {
            prop_assert!(task.is_finished());
        }
    }

    /// Cancelling a chain before it starts leaves every task Cancelled and
    /// the workflow reports no unfinished-but-runnable state: cancellation
    /// is terminal for every member of the chain.
    #[test]
    fn cancelling_an_unstarted_chain_cancels_every_task(len in 1usize..12) {
        let workflow = Workflow::with_pool("cancel-chain", Arc::new(SyncWorkerPool::new()));
        let log = ExecutionLog::new();
        let tasks = build_chain(&workflow, len, &log);

        workflow.cancel();

        prop_assert!(log.snapshot().is_empty());
        for task in &tasks {
            prop_assert!(task.is_cancelled());
        }
    }

    /// A chain that finishes, then is reset, returns every task to Pending
    /// (or Ready for the root) with no stored result, and restarting it
    /// reruns every task exactly once more.
    #[test]
    fn reset_then_start_reruns_the_whole_chain(len in 1usize..8) {
        let workflow = Workflow::with_pool("reset-chain", Arc::new(SyncWorkerPool::new()));
        let log = ExecutionLog::new();
        let tasks = build_chain(&workflow, len, &log);

        workflow.start();
        prop_assert!(!workflow.has_unfinished_tasks());

        workflow.reset();
        for task in &tasks {
            prop_assert!(task.is_pending() || task.is_ready());
            prop_assert!(task.result_value().is_none());
        }

        workflow.start();
        let expected: Vec<String> = (0..len)
            .flat_map(|i| std::iter::repeat(format!("T{i}")).take(2))
            .collect();
        let mut sorted_actual = log.snapshot();
        sorted_actual.sort();
        let mut sorted_expected = expected;
        sorted_expected.sort();
        prop_assert_eq!(sorted_actual, sorted_expected);
        prop_assert!(!workflow.has_unfinished_tasks());
    }
}
