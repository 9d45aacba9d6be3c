//! Structural validation of task/workflow definitions before they are
//! registered with the orchestrator (spec.md §6.3, §9 design note: registration
//! failures must be caught before the network round-trip, not after).

use uw_core::{TaskDefinition, WorkerError, WorkerResult, WorkflowDefinition, TASK_TYPE_NAMES};

/// Validate one task definition: non-empty name, name is one of the closed
/// set of task types, and the timeout invariant holds.
pub fn validate_task_definition(def: &TaskDefinition) -> WorkerResult<()> {
    if def.name.is_empty() {
        return Err(WorkerError::InvalidInput(
            "task definition name must not be empty".to_string(),
        ));
    }
    if !TASK_TYPE_NAMES.contains(&def.name.as_str()) {
        return Err(WorkerError::InvalidInput(format!(
            "{} is not a recognized task type",
            def.name
        )));
    }
    if !def.is_valid() {
        return Err(WorkerError::InvalidInput(format!(
            "{}: response_timeout_seconds must be < timeout_seconds",
            def.name
        )));
    }
    Ok(())
}

/// Validate a workflow definition: non-empty task chain, every referenced
/// task type is recognized, and every task has a unique reference name.
pub fn validate_workflow_definition(def: &WorkflowDefinition) -> WorkerResult<()> {
    if def.tasks.is_empty() {
        return Err(WorkerError::InvalidInput(format!(
            "workflow {} has no tasks",
            def.name
        )));
    }

    let mut seen_refs = std::collections::HashSet::new();
    for task in &def.tasks {
        if !TASK_TYPE_NAMES.contains(&task.task_type.as_str()) {
            return Err(WorkerError::InvalidInput(format!(
                "workflow {} references unrecognized task type {}",
                def.name, task.task_type
            )));
        }
        if !seen_refs.insert(task.task_reference_name.clone()) {
            return Err(WorkerError::InvalidInput(format!(
                "workflow {} has duplicate task reference name {}",
                def.name, task.task_reference_name
            )));
        }
    }

    Ok(())
}
