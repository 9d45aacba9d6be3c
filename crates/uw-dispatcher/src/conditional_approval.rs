//! The `process_conditional_approval` auxiliary handler (spec.md §4.9) —
//! passes the conditions a decision already produced straight through.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, Task, WorkerResult};
use uw_repository::Repository;

pub struct ConditionalApprovalHandler {
    #[allow(dead_code)]
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl ConditionalApprovalHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let conditions = task
            .input_data
            .get("conditions")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("conditions".into(), conditions);
        Ok(output)
    }
}

#[async_trait]
impl Handler for ConditionalApprovalHandler {
    fn task_type(&self) -> &'static str {
        "process_conditional_approval"
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
    use uw_core::{TaskId, TaskStatus, WorkflowInstanceId};

    fn task_with(application_id: &str, conditions: Option<Value>) -> Task {
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), json!(application_id));
        if let Some(conditions) = conditions {
            input_data.insert("conditions".into(), conditions);
        }
        Task {
            task_id: TaskId("t-1".into()),
            task_type: "process_conditional_approval".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn absent_conditions_yields_empty_list() {
        let handler = ConditionalApprovalHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-1", None)).await.unwrap();
        assert_eq!(output.get("conditions").unwrap().as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn provided_conditions_pass_through_unchanged() {
        let handler = ConditionalApprovalHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let conditions = json!([{"description": "provide pay stub"}]);
        let output = handler
            .execute(&ctx, &task_with("APP-1", Some(conditions.clone())))
            .await
            .unwrap();
        assert_eq!(output.get("conditions").unwrap(), &conditions);
    }
}
