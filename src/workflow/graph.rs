// src/workflow/graph.rs

use std::collections::HashSet;

use crate::errors::{Result, WorkflowError};
use crate::task::Task;

use super::Workflow;

impl Workflow {
    /// Add `task` to this workflow with the given prerequisites.
    ///
    /// Fails if `task` already belongs to a workflow, if any prerequisite is
    /// not already a member of *this* workflow, or if `task`'s required
    /// keyed-prerequisite keys are not all satisfied by
    /// `keyed_prerequisites`.
    pub fn add_task<P, K>(&self, task: &Task, prerequisites: P, keyed_prerequisites: K) -> Result<()>
    where
        P: IntoIterator<Item = Task>,
        K: IntoIterator<Item = (String, Task)>,
    {
        if task.workflow().is_some() {
            return Err(WorkflowError::TaskAlreadyInWorkflow(task.name().to_string()));
        }

        let prerequisites: Vec<Task> = prerequisites.into_iter().collect();
        let keyed_prerequisites: Vec<(String, Task)> = keyed_prerequisites.into_iter().collect();

        let mut tasks = self.0.tasks.lock().unwrap();

        for p in prerequisites
            .iter()
            .chain(keyed_prerequisites.iter().map(|(_, t)| t))
        {
            if !tasks.contains_key(&p.id()) {
                return Err(WorkflowError::PrerequisiteNotInWorkflow(p.name().to_string()));
            }
        }

        let provided: HashSet<String> = keyed_prerequisites.iter().map(|(k, _)| k.clone()).collect();
        let required = task.required_prerequisite_keys();
        if !required.is_subset(&provided) {
            let missing: Vec<String> = required.difference(&provided).cloned().collect();
            return Err(WorkflowError::MissingRequiredPrerequisiteKeys(
                task.name().to_string(),
                missing,
            ));
        }

        task.set_workflow(self.self_weak());
        for p in &prerequisites {
            task.add_unkeyed_prerequisite(p);
            p.add_dependent(task);
        }
        for (key, p) in &keyed_prerequisites {
            task.add_keyed_prerequisite(key, p);
            p.add_dependent(task);
        }
        task.finalize_initial_state();
        tasks.insert(task.id(), task.clone());

        Ok(())
    }

    /// Convenience for adding a task with no prerequisites.
    pub fn add_root_task(&self, task: &Task) -> Result<()> {
        self.add_task(task, [], [])
    }

    fn contains(&self, task: &Task) -> bool {
        self.0.tasks.lock().unwrap().contains_key(&task.id())
    }

    pub fn prerequisites_for(&self, task: &Task) -> Option<Vec<Task>> {
        self.contains(task).then(|| task.prerequisites_snapshot())
    }

    pub fn unkeyed_prerequisites_for(&self, task: &Task) -> Option<Vec<Task>> {
        self.contains(task)
            .then(|| task.unkeyed_prerequisites_snapshot())
    }

    pub fn keyed_prerequisites_for(&self, task: &Task) -> Option<Vec<(String, Task)>> {
        self.contains(task)
            .then(|| task.keyed_prerequisites_snapshot())
    }

    pub fn dependents_for(&self, task: &Task) -> Option<Vec<Task>> {
        self.contains(task).then(|| task.dependents_snapshot())
    }

    pub fn tasks_with_no_prerequisite_tasks(&self) -> Vec<Task> {
        self.all_tasks()
            .into_iter()
            .filter(|t| t.prerequisites_snapshot().is_empty())
            .collect()
    }

    pub fn tasks_with_no_dependent_tasks(&self) -> Vec<Task> {
        self.all_tasks()
            .into_iter()
            .filter(|t| t.dependents_snapshot().is_empty())
            .collect()
    }
}
