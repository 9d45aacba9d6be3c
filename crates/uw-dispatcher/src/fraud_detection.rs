//! The `fraud_detection` auxiliary handler (spec.md §4.9) — reuses
//! `uw_risk`'s loan-amount-to-income fraud component score rather than
//! re-deriving a parallel ratio check.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, LoanApplication, Task, WorkerResult};
use uw_repository::Repository;
use uw_risk::fraud_risk_score;

pub struct FraudDetectionHandler {
    repository: Option<Arc<dyn Repository>>,
    metrics: HandlerMetrics,
}

impl FraudDetectionHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            metrics: HandlerMetrics::default(),
        }
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let user_id = task.str_or("userId", "unknown");

        let application = match &self.repository {
            Some(repo) => repo
                .get_application(application_id)
                .await?
                .unwrap_or_else(|| LoanApplication::synthesize(application_id, user_id)),
            None => LoanApplication::synthesize(application_id, user_id),
        };

        let score = fraud_risk_score(application.loan_amount, application.annual_income);
        let fraud_risk_level = if score >= 20.0 {
            "high"
        } else if score >= 10.0 {
            "medium"
        } else {
            "low"
        };

        let mut indicators = Vec::new();
        if application.annual_income > 0.0 {
            let ratio = application.loan_amount / application.annual_income;
            if ratio > 2.0 {
                indicators.push("requested amount exceeds 2x annual income".to_string());
            } else if ratio > 1.0 {
                indicators.push("requested amount exceeds annual income".to_string());
            }
        } else {
            indicators.push("no annual income on file".to_string());
        }

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("fraudScore".into(), score.into());
        output.insert("fraudRiskLevel".into(), fraud_risk_level.into());
        output.insert("indicators".into(), indicators.into());
        Ok(output)
    }
}

#[async_trait]
impl Handler for FraudDetectionHandler {
    fn task_type(&self) -> &'static str {
        "fraud_detection"
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
