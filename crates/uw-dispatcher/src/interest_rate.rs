//! The `calculate_interest_rate` auxiliary handler (spec.md §4.9). Unlike
//! `underwriting_decision`, this one is standalone: it does not consult the
//! configurable policy matrix, just a fixed score-bucket table, so it can run
//! without a policy loaded.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{
    round_money, CreditReport, Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot,
    RiskLevel, Task, WorkerResult, APR_SPREAD, CREDIT_REPORT_MAX_AGE_DAYS, RISK_ASSESSMENT_MAX_AGE_HOURS,
};
use uw_repository::Repository;

fn base_rate_for_score(score: i32) -> f64 {
    if score >= 800 {
        5.5
    } else if score >= 740 {
        6.5
    } else if score >= 670 {
        8.0
    } else if score >= 620 {
        12.0
    } else {
        18.0
    }
}

fn risk_adjustment(risk_level: RiskLevel) -> f64 {
    match risk_level {
        RiskLevel::Low => -0.5,
        RiskLevel::Medium => 0.0,
        RiskLevel::High => 2.0,
        RiskLevel::Critical => 5.0,
    }
}

pub struct InterestRateHandler {
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl InterestRateHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;

        let credit_report = match &self.repository {
            Some(repo) => match repo.get_credit_report(application_id).await? {
                Some(report) if report.is_fresh(CREDIT_REPORT_MAX_AGE_DAYS) => report,
                _ => CreditReport::synthesize().enrich(),
            },
            None => CreditReport::synthesize().enrich(),
        };

        let risk_level = match &self.repository {
            Some(repo) => match repo.get_risk_assessment(application_id).await? {
                Some(assessment) if assessment.is_fresh(RISK_ASSESSMENT_MAX_AGE_HOURS) => {
                    assessment.overall_risk_level
                }
                _ => RiskLevel::Medium,
            },
            None => RiskLevel::Medium,
        };

        let rate = round_money(base_rate_for_score(credit_report.credit_score) + risk_adjustment(risk_level));
        let apr = round_money(rate + APR_SPREAD);

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("interestRate".into(), rate.into());
        output.insert("apr".into(), apr.into());
        Ok(output)
    }
}

#[async_trait]
impl Handler for InterestRateHandler {
    fn task_type(&self) -> &'static str {
        "calculate_interest_rate"
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
    use uw_core::{LoanApplication, RiskAssessment, RiskComponentScores, TaskId, TaskStatus, WorkflowInstanceId};
    use uw_repository::InMemoryRepository;

    fn task_with(application_id: &str) -> Task {
        let mut input_data = Map::new();
        input_data.insert("applicationId".into(), json!(application_id));
        Task {
            task_id: TaskId("t-1".into()),
            task_type: "calculate_interest_rate".into(),
            workflow_instance_id: WorkflowInstanceId("wf-1".into()),
            input_data,
            status: TaskStatus::InProgress,
        }
    }

    #[tokio::test]
    async fn synthesized_application_gets_a_rate_within_bounds() {
        let handler = InterestRateHandler::new(None);
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-1")).await.unwrap();
        let rate = output.get("interestRate").unwrap().as_f64().unwrap();
        assert!((5.0..=23.0).contains(&rate));
    }

    #[tokio::test]
    async fn excellent_score_low_risk_gets_five_point_zero() {
        let repo = Arc::new(InMemoryRepository::default());
        repo.put_application(LoanApplication::synthesize("APP-1", "USER-1"))
            .await
            .unwrap();
        let mut report = CreditReport::synthesize().enrich();
        report.credit_score = 820;
        repo.put_credit_report("APP-1", report).await.unwrap();
        repo.put_risk_assessment(
            "APP-1",
            RiskAssessment {
                overall_risk_level: RiskLevel::Low,
                overall_score: 10.0,
                component_scores: RiskComponentScores {
                    credit: 0.0,
                    income: 0.0,
                    debt: 0.0,
                    fraud: 0.0,
                },
                risk_factors: Vec::new(),
                mitigating_factors: Vec::new(),
                probability_of_default: 0.01,
                model_version: "risk-model-v1".to_string(),
                confidence_level: 0.9,
                assessed_at: chrono::Utc::now(),
            },
        )
        .await
        .unwrap();

        let handler = InterestRateHandler::new(Some(repo));
        let ctx = HandlerContext::with_timeout(std::time::Duration::from_secs(5));
        let output = handler.execute(&ctx, &task_with("APP-1")).await.unwrap();
        assert_eq!(output.get("interestRate").unwrap(), &json!(5.0));
        assert_eq!(output.get("apr").unwrap(), &json!(5.5));
    }
}
