//! The `process_denial` auxiliary handler (spec.md §4.9) — packages the
//! reasons a decision already produced alongside standard adverse-action
//! next steps.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, Task, WorkerResult};
use uw_repository::Repository;

const DEFAULT_DENIAL_REASON: &str = "application does not meet underwriting criteria";

const NEXT_STEPS: &[&str] = &[
    "a copy of your credit report is available upon request",
    "you may reapply after addressing the reasons listed above",
    "contact customer service with questions about this decision",
];

pub struct ProcessDenialHandler {
    #[allow(dead_code)]
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl ProcessDenialHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;

        let denial_reasons: Vec<String> = match task.input_data.get("denialReasons").and_then(Value::as_array) {
            Some(reasons) => reasons
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => vec![DEFAULT_DENIAL_REASON.to_string()],
        };

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("denialReasons".into(), denial_reasons.into());
        output.insert(
            "nextSteps".into(),
            NEXT_STEPS.iter().map(|s| s.to_string()).collect::<Vec<_>>().into(),
        );
        Ok(output)
    }
}

#[async_trait]
impl Handler for ProcessDenialHandler {
    fn task_type(&self) -> &'static str {
        "process_denial"
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

    fn task_with(application_id: &str, reasons: Option<Vec<&str>>) -> Task {
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), json!(application_id));
        if let Some(reasons) = reasons {
            input_data.insert("denialReasons".into(), json!(reasons));
        }
        Task {
            task_id: TaskId("t-1".into()),
            task_type: "process_denial".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn missing_reasons_falls_back_to_default() {
        let handler = ProcessDenialHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-1", None)).await.unwrap();
        assert_eq!(output.get("denialReasons").unwrap().as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn provided_reasons_are_carried_through() {
        let handler = ProcessDenialHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler
            .execute(&ctx, &task_with("APP-1", Some(vec!["score too low", "dti too high"])))
            .await
            .unwrap();
        assert_eq!(output.get("denialReasons").unwrap().as_array().unwrap().len(), 2);
        assert!(!output.get("nextSteps").unwrap().as_array().unwrap().is_empty());
    }
}
