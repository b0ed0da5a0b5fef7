#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use taskgraph::types::value;
use taskgraph::Task;

/// Records the order tasks actually ran in, for assertions about dispatch
/// ordering in pipeline/diamond-shaped graphs.
#[derive(Clone, Default)]
pub struct ExecutionLog(Arc<Mutex<Vec<String>>>);

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TestFailure(pub String);

/// A closure task that immediately finishes with `format!("{name}-ok")`,
/// recording its name in `log` first.
pub fn finishing_task(name: &str, log: &ExecutionLog) -> Task {
    let name_owned = name.to_string();
    let log = log.clone();
    Task::closure(name, move |task| {
        log.record(&name_owned);
        task.finish(value(format!("{name_owned}-ok")));
    })
}

/// A closure task that immediately fails with `message`, recording its name
/// in `log` first.
pub fn failing_task(name: &str, log: &ExecutionLog, message: &str) -> Task {
    let name_owned = name.to_string();
    let log = log.clone();
    let message = message.to_string();
    Task::closure(name, move |task| {
        log.record(&name_owned);
        task.fail(Arc::new(TestFailure(message.clone())));
    })
}
