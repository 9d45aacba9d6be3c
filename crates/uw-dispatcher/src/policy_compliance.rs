//! The `policy_compliance_check` auxiliary handler (spec.md §4.9) — rechecks
//! just the credit-score and DTI hard limits against whatever
//! application/credit state is on file right now. Unlike
//! `underwriting_decision`'s full check, this one does not recheck minimum
//! income or loan-amount range.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{
    CreditReport, Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, LoanApplication,
    Task, UnderwritingPolicy, WorkerResult, CREDIT_REPORT_MAX_AGE_DAYS,
};
use uw_decision::policy::score_and_dti_violations;
use uw_repository::Repository;

pub struct PolicyComplianceHandler {
    repository: Option<Arc<dyn Repository>>,
    policy: UnderwritingPolicy,
    metrics: HandlerMetrics,
}

impl PolicyComplianceHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>, policy: UnderwritingPolicy) -> Self {
        Self {
            repository,
            policy,
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

        let credit_report = match &self.repository {
            Some(repo) => match repo.get_credit_report(application_id).await? {
                Some(report) if report.is_fresh(CREDIT_REPORT_MAX_AGE_DAYS) => report,
                _ => CreditReport::synthesize().enrich(),
            },
            None => CreditReport::synthesize().enrich(),
        };

        let violations = score_and_dti_violations(&application, credit_report.credit_score, &self.policy);
        let compliant = violations.is_empty();

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("compliant".into(), compliant.into());
        output.insert("violations".into(), violations.into());
        Ok(output)
    }
}

#[async_trait]
impl Handler for PolicyComplianceHandler {
    fn task_type(&self) -> &'static str {
        "policy_compliance_check"
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
