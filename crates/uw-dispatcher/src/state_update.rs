//! The `update_application_state` task handler (spec.md §4.8).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use uw_core::{Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, Task, WorkerResult};
use uw_repository::Repository;

pub struct StateUpdateHandler {
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl StateUpdateHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let new_state = task.require_str("newState")?;
        let reason = task.str_or("reason", "");

        let (previous_state, new_state) = match &self.repository {
            Some(repo) => repo.update_application_state(application_id, new_state).await?,
            None => ("unknown".to_string(), new_state.to_string()),
        };

        info!(application_id, previous_state, new_state, "application state updated");

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("previousState".into(), previous_state.into());
        output.insert("newState".into(), new_state.into());
        if !reason.is_empty() {
            output.insert("reason".into(), reason.into());
        }
        Ok(output)
    }
}

#[async_trait]
impl Handler for StateUpdateHandler {
    fn task_type(&self) -> &'static str {
        "update_application_state"
    }

    async fn execute(&self, _ctx: &HandlerContext, task: &Task) -> WorkerResult<Map<String, Value>> {
        let started = std::time::Instant::now();
        let result = self.run(task).await;
        match &result {
            Ok(_) => self.metrics.record_completed(started.elapsed()),
            Err(_) => self.metrics.record_failed(started.elapsed()),
        }
        result
    }

    fn metrics(&self) -> HandlerMetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uw_core::{LoanApplication, TaskId, TaskStatus, WorkflowInstanceId};
    use uw_repository::InMemoryRepository;

    fn task_with(application_id: &str, new_state: &str) -> Task {
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), json!(application_id));
        input_data.insert("newState".into(), json!(new_state));
        Task {
            task_id: TaskId("t-1".into()),
            task_type: "update_application_state".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn absent_repository_returns_mock_transition() {
        let handler = StateUpdateHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-1", "approved")).await.unwrap();
        assert_eq!(output.get("previousState").unwrap(), "unknown");
        assert_eq!(output.get("newState").unwrap(), "approved");
    }

    #[tokio::test]
    async fn repository_backed_update_reports_previous_state() {
        let repo = Arc::new(InMemoryRepository::default());
        repo.put_application(LoanApplication::synthesize("APP-1", "USER-1"))
            .await
            .unwrap();
        let handler = StateUpdateHandler::new(Some(repo));
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-1", "approved")).await.unwrap();
        assert_eq!(output.get("previousState").unwrap(), "credit_check_in_progress");
        assert_eq!(output.get("newState").unwrap(), "approved");
    }

    #[tokio::test]
    async fn missing_new_state_fails() {
        let handler = StateUpdateHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), json!("APP-1"));
        let task = Task {
            task_id: TaskId("t-1".into()),
            task_type: "update_application_state".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        };
        assert!(handler.execute(&ctx, &task).await.is_err());
    }
}
