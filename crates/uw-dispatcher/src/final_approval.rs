//! The `final_approval` auxiliary handler (spec.md §4.9) — stamps a loan
//! number and offer window onto an already-approved application.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, Task, WorkerResult, OFFER_EXPIRATION_DAYS};
use uw_repository::Repository;

fn loan_number(application_id: &str, now: chrono::DateTime<chrono::Utc>) -> String {
    let prefix: String = application_id.chars().take(8).collect();
    format!("UW-{}-{}", prefix, now.timestamp())
}

pub struct FinalApprovalHandler {
    #[allow(dead_code)]
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl FinalApprovalHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let now = chrono::Utc::now();
        let offer_expiration_date = now + chrono::Duration::days(OFFER_EXPIRATION_DAYS);

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("loanNumber".into(), loan_number(application_id, now).into());
        output.insert("offerExpirationDate".into(), offer_expiration_date.to_rfc3339().into());
        Ok(output)
    }
}

#[async_trait]
impl Handler for FinalApprovalHandler {
    fn task_type(&self) -> &'static str {
        "final_approval"
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

    fn task_with(application_id: &str) -> Task {
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), json!(application_id));
        Task {
            task_id: TaskId("t-1".into()),
            task_type: "final_approval".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn loan_number_carries_application_prefix() {
        let handler = FinalApprovalHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-12345678-XYZ")).await.unwrap();
        let loan_number = output.get("loanNumber").unwrap().as_str().unwrap();
        assert!(loan_number.starts_with("UW-APP-1234"));
    }

    #[tokio::test]
    async fn offer_expires_seven_days_out() {
        let handler = FinalApprovalHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-1")).await.unwrap();
        let expires: chrono::DateTime<chrono::Utc> = output
            .get("offerExpirationDate")
            .unwrap()
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!((expires - chrono::Utc::now()).num_days(), OFFER_EXPIRATION_DAYS - 1);
    }
}
