//! uw-core::task
//!
//! Wire types exchanged with the orchestrator: the unit of work polled by a
//! worker ([`Task`]) and the envelope it reports back ([`TaskResult`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{TaskId, WorkflowInstanceId};

/// Status of a [`Task`] as seen by the worker. Always `InProgress` on receipt
/// — the orchestrator does not hand out tasks in any other state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    InProgress,
}

/// A unit of work polled from the orchestrator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub task_type: String,
    pub workflow_instance_id: WorkflowInstanceId,
    #[serde(default)]
    pub input_data: Map<String, Value>,
    pub status: TaskStatus,
}

impl Task {
    /// Look up an input key, returning `None` for missing or JSON-null values.
    pub fn input(&self, key: &str) -> Option<&Value> {
        self.input_data.get(key).filter(|v| !v.is_null())
    }

    /// Fetch a required non-empty string input field.
    pub fn require_str(&self, key: &str) -> Result<&str, crate::error::WorkerError> {
        match self.input(key).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(crate::error::WorkerError::MissingField {
                field: key.to_string(),
            }),
        }
    }

    /// Fetch an optional string input field, falling back to `default` when
    /// absent, empty, or non-string.
    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.input(key).and_then(Value::as_str).unwrap_or(default)
    }

    /// `applicationId`, required non-empty (spec.md §4.4 precondition).
    pub fn application_id(&self) -> Result<&str, crate::error::WorkerError> {
        match self.input("applicationId").and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(crate::error::WorkerError::MissingApplicationId),
        }
    }

    /// `userId`, required non-empty (spec.md §4.4 precondition).
    pub fn user_id(&self) -> Result<&str, crate::error::WorkerError> {
        match self.input("userId").and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(crate::error::WorkerError::MissingUserId),
        }
    }
}

/// Outcome status reported back to the orchestrator for a completed task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Completed,
    Failed,
    TimedOut,
}

/// The envelope reported back to the orchestrator for a `Task`.
///
/// Invariant (spec.md §8): `task_id` and `workflow_instance_id` always equal
/// those of the originating `Task`; `output_data` is never empty and always
/// carries `processing_time` + `timestamp`; `reason_for_incompletion` is
/// non-empty iff `status != Completed`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: TaskId,
    pub workflow_instance_id: WorkflowInstanceId,
    pub reference_task_name: String,
    pub worker_id: String,
    pub status: ResultStatus,
    pub output_data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_incompletion: Option<String>,
}

impl TaskResult {
    /// Build a `COMPLETED` result, injecting `processing_time` and
    /// `timestamp` into the handler's output map.
    pub fn completed(task: &Task, worker_id: &str, mut output_data: Map<String, Value>, elapsed: std::time::Duration) -> Self {
        output_data.insert("processing_time".into(), elapsed.as_secs_f64().into());
        output_data.insert(
            "timestamp".into(),
            chrono::Utc::now().to_rfc3339().into(),
        );
        Self {
            task_id: task.task_id.clone(),
            workflow_instance_id: task.workflow_instance_id.clone(),
            reference_task_name: task.task_type.clone(),
            worker_id: worker_id.to_string(),
            status: ResultStatus::Completed,
            output_data,
            reason_for_incompletion: None,
        }
    }

    /// Build a `FAILED` result carrying at minimum `error`, `processing_time`
    /// and `timestamp` in `output_data`.
    pub fn failed(task: &Task, worker_id: &str, reason: impl Into<String>, elapsed: std::time::Duration) -> Self {
        let reason = reason.into();
        let mut output_data = Map::new();
        output_data.insert("error".into(), reason.clone().into());
        output_data.insert("processing_time".into(), elapsed.as_secs_f64().into());
        output_data.insert(
            "timestamp".into(),
            chrono::Utc::now().to_rfc3339().into(),
        );
        Self {
            task_id: task.task_id.clone(),
            workflow_instance_id: task.workflow_instance_id.clone(),
            reference_task_name: task.task_type.clone(),
            worker_id: worker_id.to_string(),
            status: ResultStatus::Failed,
            output_data,
            reason_for_incompletion: Some(reason),
        }
    }

    /// Build a `TIMED_OUT` result.
    pub fn timed_out(task: &Task, worker_id: &str, elapsed: std::time::Duration) -> Self {
        let mut r = Self::failed(
            task,
            worker_id,
            format!("task execution timed out after {:.3}s", elapsed.as_secs_f64()),
            elapsed,
        );
        r.status = ResultStatus::TimedOut;
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), "APP-1".into());
        Task {
            task_id: TaskId("t-1".into()),
            task_type: "credit_check".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[test]
    fn completed_result_carries_task_identity_and_injected_fields() {
        let task = sample_task();
        let result = TaskResult::completed(&task, "worker-1", Map::new(), std::time::Duration::from_millis(10));
        assert_eq!(result.task_id, task.task_id);
        assert_eq!(result.workflow_instance_id, task.workflow_instance_id);
        assert_eq!(result.status, ResultStatus::Completed);
        assert!(result.reason_for_incompletion.is_none());
        assert!(result.output_data.contains_key("processing_time"));
        assert!(result.output_data.contains_key("timestamp"));
    }

    #[test]
    fn failed_result_has_nonempty_reason_and_error_field() {
        let task = sample_task();
        let result = TaskResult::failed(&task, "worker-1", "boom", std::time::Duration::from_millis(5));
        assert_eq!(result.status, ResultStatus::Failed);
        assert_eq!(result.reason_for_incompletion.as_deref(), Some("boom"));
        assert_eq!(result.output_data.get("error").and_then(Value::as_str), Some("boom"));
    }

    #[test]
    fn require_str_rejects_empty_and_missing() {
        let task = sample_task();
        assert_eq!(task.require_str("applicationId").unwrap(), "APP-1");
        assert!(task.require_str("userId").is_err());
    }

    #[test]
    fn application_id_and_user_id_surface_precise_errors() {
        let task = sample_task();
        assert_eq!(task.application_id().unwrap(), "APP-1");
        assert!(matches!(
            task.user_id(),
            Err(crate::error::WorkerError::MissingUserId)
        ));
    }
}
