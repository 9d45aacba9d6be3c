//! The `credit_check` task handler (spec.md §4.4).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use uw_core::{
    risk_level_from_score, CreditReport, Handler, HandlerContext, HandlerMetrics,
    HandlerMetricsSnapshot, LoanApplication, Task, WorkerResult, CREDIT_REPORT_MAX_AGE_DAYS,
};
use uw_repository::Repository;
use uw_risk::credit_risk_score;

use crate::decision::decide;

pub struct CreditCheckHandler {
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl CreditCheckHandler {
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

    async fn resolve_credit_report(&self, application_id: &str) -> CreditReport {
        if let Some(repo) = &self.repository {
            if let Ok(Some(report)) = repo.get_credit_report(application_id).await {
                if report.is_fresh(CREDIT_REPORT_MAX_AGE_DAYS) {
                    return report;
                }
            }
        }
        CreditReport::synthesize().enrich()
    }
}

impl CreditCheckHandler {
    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let user_id = task.user_id()?;

        let application = self.resolve_application(application_id, user_id).await;
        let report = self.resolve_credit_report(application_id).await;

        if let Some(repo) = &self.repository {
            let _ = repo.put_credit_report(application_id, report.clone()).await;
        }

        let credit_risk = credit_risk_score(&report);
        let risk_level = risk_level_from_score(credit_risk);
        let decision = decide(&report, risk_level);

        info!(
            application_id,
            credit_score = report.credit_score,
            approved = decision.approved,
            manual_review_required = decision.manual_review_required,
            "credit check complete"
        );

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("userId".into(), user_id.into());
        output.insert("loanAmount".into(), application.loan_amount.into());
        output.insert("creditScore".into(), report.credit_score.into());
        output.insert("creditScoreRange".into(), report.credit_score_range.to_string().into());
        output.insert("creditUtilization".into(), report.credit_utilization.into());
        output.insert(
            "paymentHistory".into(),
            serde_json::json!({
                "onTime": report.payment_history.on_time,
                "late30": report.payment_history.late_30,
                "late60": report.payment_history.late_60,
                "late90": report.payment_history.late_90,
                "delinquencies": report.payment_history.delinquencies(),
            }),
        );
        output.insert(
            "derogatoryCounts".into(),
            serde_json::json!({
                "bankruptcies": report.derogatory_counts.bankruptcies,
                "liens": report.derogatory_counts.liens,
                "judgments": report.derogatory_counts.judgments,
                "total": report.derogatory_counts.total(),
            }),
        );
        output.insert(
            "riskAnalysis".into(),
            serde_json::json!({
                "creditRiskScore": credit_risk,
                "riskLevel": risk_level.to_string(),
            }),
        );
        output.insert(
            "creditDecision".into(),
            serde_json::json!({
                "approved": decision.approved,
                "manualReviewRequired": decision.manual_review_required,
                "reasons": decision.reasons,
                "recommendations": decision.recommendations,
            }),
        );
        output.insert(
            "reportMetadata".into(),
            serde_json::json!({
                "reportDate": report.report_date.to_rfc3339(),
                "publicRecords": report.public_records,
            }),
        );

        Ok(output)
    }
}

#[async_trait]
impl Handler for CreditCheckHandler {
    fn task_type(&self) -> &'static str {
        "credit_check"
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
            task_type: "credit_check".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn clean_application_is_approved() {
        let handler = CreditCheckHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let task = task_with("APP-12345", "USER-67890");
        let output = handler.execute(&ctx, &task).await.unwrap();
        let decision = output.get("creditDecision").unwrap();
        assert_eq!(decision["approved"], json!(true));
    }

    #[tokio::test]
    async fn missing_application_id_fails_with_precise_message() {
        let handler = CreditCheckHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let task = task_with("", "USER-1");
        let err = handler.execute(&ctx, &task).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "application ID is required and must be a non-empty string"
        );
    }
}
