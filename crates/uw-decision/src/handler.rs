//! The `underwriting_decision` task handler (spec.md §4.7). Unlike the other
//! domain handlers, this one has no "capability absent, synthesize a mock"
//! branch: by the time this task runs, credit_check/income_verification/
//! risk_assessment must already have written their results to the
//! repository, so a missing entity here means an upstream step failed or
//! never ran, and the task itself fails rather than guessing.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use uw_core::{
    round_money, Condition, CounterOfferTerms, Decision, Handler, HandlerContext, HandlerMetrics,
    HandlerMetricsSnapshot, RiskLevel, Task, UnderwritingPolicy, VerificationStatus, WorkerError,
    WorkerResult, CONDITIONAL_CONDITION_DUE_DAYS, INCOME_VERIFICATION_CONDITION_DUE_DAYS,
};
use uw_repository::Repository;

use crate::financials::compute as compute_financials;
use crate::policy::violations;
use crate::rate::{counter_offer, matrix_rate, offer_expiration};

pub struct UnderwritingDecisionHandler {
    repository: Arc<dyn Repository>,
    policy: UnderwritingPolicy,
    metrics: HandlerMetrics,
}

impl UnderwritingDecisionHandler {
    pub fn new(repository: Arc<dyn Repository>, policy: UnderwritingPolicy) -> Self {
        Self {
            repository,
            policy,
            metrics: HandlerMetrics::default(),
        }
    }
}

impl UnderwritingDecisionHandler {
    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let user_id = task.user_id()?;

        let application = self
            .repository
            .get_application(application_id)
            .await
            .map_err(|e| WorkerError::Repository(e.to_string()))?
            .ok_or_else(|| WorkerError::ApplicationNotFound(application_id.to_string()))?;

        let credit_report = self
            .repository
            .get_credit_report(application_id)
            .await
            .map_err(|e| WorkerError::Repository(e.to_string()))?
            .ok_or_else(|| WorkerError::Other(format!("no credit report on file for {application_id}")))?;

        let risk_assessment = self
            .repository
            .get_risk_assessment(application_id)
            .await
            .map_err(|e| WorkerError::Repository(e.to_string()))?
            .ok_or_else(|| WorkerError::Other(format!("no risk assessment on file for {application_id}")))?;

        let income_verification = self
            .repository
            .get_income_verification(application_id)
            .await
            .map_err(|e| WorkerError::Repository(e.to_string()))?
            .ok_or_else(|| WorkerError::Other(format!("no income verification on file for {application_id}")))?;

        let now = chrono::Utc::now();
        let offer_expiration_date = offer_expiration(now);

        let policy_violations = violations(&application, credit_report.credit_score, &self.policy);
        if !policy_violations.is_empty() {
            let result = denial(policy_violations, offer_expiration_date);
            return Ok(render(application_id, user_id, &result));
        }

        let rate = matrix_rate(
            &self.policy.interest_rate_matrix,
            credit_report.credit_score_range,
            risk_assessment.overall_risk_level,
        );

        let mut result = match risk_assessment.overall_risk_level {
            RiskLevel::Low => approve(&application, rate, offer_expiration_date),
            RiskLevel::Medium => conditional(&application, rate, &risk_assessment.risk_factors, now, offer_expiration_date),
            RiskLevel::High => manual_review(offer_expiration_date),
            RiskLevel::Critical => denied_with_counter_offer(&application, &self.policy, rate, offer_expiration_date),
        };

        if income_verification.verification_status != VerificationStatus::Verified {
            result.manual_review_required = true;
            result.conditions.push(Condition {
                description: "income verification required".to_string(),
                due_date: now + chrono::Duration::days(INCOME_VERIFICATION_CONDITION_DUE_DAYS),
                condition_type: "income_verification_required".to_string(),
                priority: "critical".to_string(),
                status: "pending".to_string(),
            });
        }

        info!(
            application_id,
            decision = %result.decision,
            manual_review_required = result.manual_review_required,
            "underwriting decision complete"
        );

        Ok(render(application_id, user_id, &result))
    }
}

#[async_trait]
impl Handler for UnderwritingDecisionHandler {
    fn task_type(&self) -> &'static str {
        "underwriting_decision"
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

struct Outcome {
    decision: Decision,
    approved_amount: Option<f64>,
    approved_term: Option<u32>,
    interest_rate: Option<f64>,
    apr: Option<f64>,
    monthly_payment: Option<f64>,
    total_interest: Option<f64>,
    total_payment: Option<f64>,
    conditions: Vec<Condition>,
    decision_reasons: Vec<String>,
    counter_offer_terms: Option<CounterOfferTerms>,
    manual_review_required: bool,
    offer_expiration_date: uw_core::Timestamp,
}

fn denial(reasons: Vec<String>, offer_expiration_date: uw_core::Timestamp) -> Outcome {
    Outcome {
        decision: Decision::Denied,
        approved_amount: None,
        approved_term: None,
        interest_rate: None,
        apr: None,
        monthly_payment: None,
        total_interest: None,
        total_payment: None,
        conditions: Vec::new(),
        decision_reasons: reasons,
        counter_offer_terms: None,
        manual_review_required: false,
        offer_expiration_date,
    }
}

fn approve(application: &uw_core::LoanApplication, rate: f64, offer_expiration_date: uw_core::Timestamp) -> Outcome {
    let financials = compute_financials(application.loan_amount, rate, application.requested_term_months);
    Outcome {
        decision: Decision::Approved,
        approved_amount: Some(application.loan_amount),
        approved_term: Some(application.requested_term_months),
        interest_rate: Some(rate),
        apr: Some(round_money(rate + 0.5)),
        monthly_payment: Some(financials.monthly_payment),
        total_interest: Some(financials.total_interest),
        total_payment: Some(financials.total_payment),
        conditions: Vec::new(),
        decision_reasons: Vec::new(),
        counter_offer_terms: None,
        manual_review_required: false,
        offer_expiration_date,
    }
}

fn conditional(
    application: &uw_core::LoanApplication,
    rate: f64,
    risk_factors: &[String],
    now: uw_core::Timestamp,
    offer_expiration_date: uw_core::Timestamp,
) -> Outcome {
    let financials = compute_financials(application.loan_amount, rate, application.requested_term_months);
    let due_date = now + chrono::Duration::days(CONDITIONAL_CONDITION_DUE_DAYS);
    let conditions = risk_factors
        .iter()
        .map(|factor| Condition {
            description: factor.clone(),
            due_date,
            condition_type: "prior_to_funding".to_string(),
            priority: "high".to_string(),
            status: "pending".to_string(),
        })
        .collect();

    Outcome {
        decision: Decision::Conditional,
        approved_amount: Some(application.loan_amount),
        approved_term: Some(application.requested_term_months),
        interest_rate: Some(rate),
        apr: Some(round_money(rate + 0.5)),
        monthly_payment: Some(financials.monthly_payment),
        total_interest: Some(financials.total_interest),
        total_payment: Some(financials.total_payment),
        conditions,
        decision_reasons: Vec::new(),
        counter_offer_terms: None,
        manual_review_required: false,
        offer_expiration_date,
    }
}

fn manual_review(offer_expiration_date: uw_core::Timestamp) -> Outcome {
    Outcome {
        decision: Decision::ManualReview,
        approved_amount: None,
        approved_term: None,
        interest_rate: None,
        apr: None,
        monthly_payment: None,
        total_interest: None,
        total_payment: None,
        conditions: Vec::new(),
        decision_reasons: Vec::new(),
        counter_offer_terms: None,
        manual_review_required: true,
        offer_expiration_date,
    }
}

fn denied_with_counter_offer(
    application: &uw_core::LoanApplication,
    policy: &UnderwritingPolicy,
    rate: f64,
    offer_expiration_date: uw_core::Timestamp,
) -> Outcome {
    let counter_offer_terms = counter_offer(application.loan_amount, policy.min_loan_amount, rate).map(|offer| {
        CounterOfferTerms {
            amount: offer.amount,
            rate: offer.rate,
            expiration_date: offer_expiration_date,
        }
    });

    Outcome {
        decision: Decision::Denied,
        approved_amount: None,
        approved_term: None,
        interest_rate: None,
        apr: None,
        monthly_payment: None,
        total_interest: None,
        total_payment: None,
        conditions: Vec::new(),
        decision_reasons: vec!["overall risk level is critical".to_string()],
        counter_offer_terms,
        manual_review_required: false,
        offer_expiration_date,
    }
}

fn render(application_id: &str, user_id: &str, result: &Outcome) -> Map<String, Value> {
    let mut output = Map::new();
    output.insert("applicationId".into(), application_id.into());
    output.insert("userId".into(), user_id.into());
    output.insert("decision".into(), result.decision.to_string().into());
    output.insert("approvedAmount".into(), json_opt(result.approved_amount));
    output.insert("approvedTerm".into(), json_opt(result.approved_term));
    output.insert("interestRate".into(), json_opt(result.interest_rate));
    output.insert("apr".into(), json_opt(result.apr));
    output.insert("monthlyPayment".into(), json_opt(result.monthly_payment));
    output.insert("totalInterest".into(), json_opt(result.total_interest));
    output.insert("totalPayment".into(), json_opt(result.total_payment));
    output.insert(
        "conditions".into(),
        serde_json::to_value(&result.conditions).unwrap_or(Value::Null),
    );
    output.insert("decisionReasons".into(), result.decision_reasons.clone().into());
    output.insert(
        "counterOfferTerms".into(),
        result
            .counter_offer_terms
            .as_ref()
            .map(|t| serde_json::to_value(t).unwrap_or(Value::Null))
            .unwrap_or(Value::Null),
    );
    output.insert("automatedDecision".into(), true.into());
    output.insert("manualReviewRequired".into(), result.manual_review_required.into());
    output.insert(
        "offerExpirationDate".into(),
        result.offer_expiration_date.to_rfc3339().into(),
    );
    output
}

fn json_opt<T: Into<Value>>(v: Option<T>) -> Value {
    v.map(Into::into).unwrap_or(Value::Null)
}
