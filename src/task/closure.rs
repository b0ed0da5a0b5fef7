// src/task/closure.rs

use std::collections::HashSet;
use std::sync::Arc;

use super::core::TaskBody;
use super::Task;

struct ClosureBody<F>(F)
where
    F: Fn(&Task) + Send + Sync;

impl<F> TaskBody for ClosureBody<F>
where
    F: Fn(&Task) + Send + Sync,
{
    fn run(&self, task: &Task) {
        (self.0)(task);
    }
}

/// A task whose body is an arbitrary closure. The closure receives the task
/// handle and must itself call `finish`/`fail` on it; the engine never
/// infers success from the closure simply returning.
pub struct ClosureTask {
    task: Task,
}

impl ClosureTask {
    pub fn new(
        name: impl Into<String>,
        required_prerequisite_keys: HashSet<String>,
        body: impl Fn(&Task) + Send + Sync + 'static,
    ) -> Self {
        let task = Task::with_body(
            name,
            required_prerequisite_keys,
            Arc::new(ClosureBody(body)),
        );
        Self { task }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn into_task(self) -> Task {
        self.task
    }
}
