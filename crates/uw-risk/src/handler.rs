//! The `risk_assessment` task handler (spec.md §4.6).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use uw_core::{
    CreditReport, Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot,
    IncomeVerification, LoanApplication, Task, VerificationStatus, WorkerResult,
};
use uw_repository::Repository;

use crate::scoring::{assess, AssessmentInputs};

pub struct RiskAssessmentHandler {
    repository: Option<Arc<dyn Repository>>,
    model_version: String,
    metrics: HandlerMetrics,
}

impl RiskAssessmentHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            model_version: "risk-model-v1".to_string(),
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
                if report.is_fresh(uw_core::CREDIT_REPORT_MAX_AGE_DAYS) {
                    return report;
                }
            }
        }
        CreditReport::synthesize().enrich()
    }

    async fn resolve_income_verification(&self, application_id: &str) -> Option<IncomeVerification> {
        if let Some(repo) = &self.repository {
            return repo.get_income_verification(application_id).await.ok().flatten();
        }
        None
    }
}

impl RiskAssessmentHandler {
    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let user_id = task.user_id()?;

        let application = self.resolve_application(application_id, user_id).await;
        let credit_report = self.resolve_credit_report(application_id).await;
        let income_verification = self.resolve_income_verification(application_id).await;

        let verification_status = income_verification
            .as_ref()
            .map(|v| v.verification_status)
            .unwrap_or(VerificationStatus::Unverified);

        let inputs = AssessmentInputs {
            credit_report: &credit_report,
            annual_income: application.annual_income,
            employment_status: &application.employment_status,
            verification_status,
            dti: application.dti(),
            loan_amount: application.loan_amount,
            model_version: &self.model_version,
            assessed_at: chrono::Utc::now(),
        };
        let assessment = assess(&inputs);

        if let Some(repo) = &self.repository {
            let _ = repo.put_risk_assessment(application_id, assessment.clone()).await;
        }

        info!(
            application_id,
            overall_risk_level = %assessment.overall_risk_level,
            overall_score = assessment.overall_score,
            "risk assessment complete"
        );

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("overallRiskLevel".into(), assessment.overall_risk_level.to_string().into());
        output.insert("overallScore".into(), assessment.overall_score.into());
        output.insert(
            "componentScores".into(),
            serde_json::json!({
                "credit": assessment.component_scores.credit,
                "income": assessment.component_scores.income,
                "debt": assessment.component_scores.debt,
                "fraud": assessment.component_scores.fraud,
            }),
        );
        output.insert("riskFactors".into(), assessment.risk_factors.clone().into());
        output.insert("mitigatingFactors".into(), assessment.mitigating_factors.clone().into());
        output.insert("probabilityOfDefault".into(), assessment.probability_of_default.into());
        output.insert("modelVersion".into(), assessment.model_version.clone().into());
        output.insert("confidenceLevel".into(), assessment.confidence_level.into());

        Ok(output)
    }
}

#[async_trait]
impl Handler for RiskAssessmentHandler {
    fn task_type(&self) -> &'static str {
        "risk_assessment"
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
