//! The `income_verification` task handler (spec.md §4.5).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use uw_core::{
    Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, LoanApplication, Task,
    VerificationStatus, WorkerResult,
};
use uw_repository::Repository;

use crate::analysis::{analyze, synthesize_verification};

pub struct IncomeVerificationHandler {
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl IncomeVerificationHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn resolve_application(&self, application_id: &str, user_id: &str) -> LoanApplication {
        if let Some(repo) = &self.repository {
            if let Ok(Some(app)) = repo.get_application(application_id).await {
                return app;
            }
        }
        LoanApplication::synthesize(application_id, user_id)
    }
}

impl IncomeVerificationHandler {
    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let user_id = task.user_id()?;
        let verification_method = task.str_or("verificationMethod", "automated_verification");

        let application = self.resolve_application(application_id, user_id).await;
        let now = chrono::Utc::now();

        let cached = if let Some(repo) = &self.repository {
            repo.get_income_verification(application_id).await.ok().flatten()
        } else {
            None
        };

        let verification = match cached {
            Some(v) if v.verification_status == VerificationStatus::Verified => {
                info!(application_id, "reusing verified income verification");
                v
            }
            _ => {
                let synthesized = synthesize_verification(application.annual_income, now);
                if let Some(repo) = &self.repository {
                    let _ = repo
                        .put_income_verification(application_id, synthesized.clone())
                        .await;
                }
                synthesized
            }
        };

        let analysis = analyze(&verification, application.annual_income, now);

        info!(
            application_id,
            verification_method,
            verification_score = analysis.verification_score,
            "income verification complete"
        );

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("verificationStatus".into(), verification.verification_status.to_string().into());
        output.insert("verifiedAnnualIncome".into(), verification.verified_annual_income.into());
        output.insert("verifiedMonthlyIncome".into(), verification.verified_monthly_income.into());
        output.insert(
            "incomeAnalysis".into(),
            serde_json::json!({
                "incomeAdequate": analysis.income_adequate,
                "incomeStability": analysis.income_stability,
                "employmentStability": analysis.employment_stability,
                "verificationScore": analysis.verification_score,
            }),
        );
        output.insert("documentsProvided".into(), verification.documents_provided.clone().into());

        Ok(output)
    }
}

#[async_trait]
impl Handler for IncomeVerificationHandler {
    fn task_type(&self) -> &'static str {
        "income_verification"
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

    fn task_with(application_id: &str, user_id: &str) -> Task {
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), json!(application_id));
        input_data.insert("userId".into(), json!(user_id));
        Task {
            task_id: TaskId("t-1".into()),
            task_type: "income_verification".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn empty_user_id_fails_with_precise_message() {
        let handler = IncomeVerificationHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let task = task_with("APP-1", "");
        let err = handler.execute(&ctx, &task).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "user ID is required and must be a non-empty string"
        );
    }

    #[tokio::test]
    async fn synthesized_verification_produces_full_output() {
        let handler = IncomeVerificationHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let task = task_with("APP-1", "USER-1");
        let output = handler.execute(&ctx, &task).await.unwrap();
        assert_eq!(output.get("verificationStatus").unwrap(), "verified");
        assert!(output.contains_key("incomeAnalysis"));
    }
}
