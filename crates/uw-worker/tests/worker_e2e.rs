//! End-to-end coverage of the worker's six reference scenarios, driven
//! against `SimulatedOrchestratorClient` + `HandlerRegistry` exactly as a
//! poller would: submit, poll, dispatch, submit the result back.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use uw_client::{OrchestratorClient, SimulatedOrchestratorClient, TaskDispatch};
use uw_core::{CreditReport, LoanApplication, ResultStatus, TaskResult};
use uw_credit::CreditCheckHandler;
use uw_decision::UnderwritingDecisionHandler;
use uw_dispatcher::{HandlerRegistry, StateUpdateHandler};
use uw_income::IncomeVerificationHandler;
use uw_repository::InMemoryRepository;
use uw_risk::RiskAssessmentHandler;

fn input(pairs: &[(&str, &str)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), json!(v));
    }
    map
}

fn full_registry(repository: Arc<InMemoryRepository>) -> HandlerRegistry {
    let policy = uw_genesis::default_policy();
    let mut registry = HandlerRegistry::new("e2e-worker");
    registry.register(Arc::new(CreditCheckHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(IncomeVerificationHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(RiskAssessmentHandler::new(Some(repository.clone()))));
    registry.register(Arc::new(UnderwritingDecisionHandler::new(repository.clone(), policy)));
    registry.register(Arc::new(StateUpdateHandler::new(Some(repository))));
    registry
}

/// Submits a task through the simulated client, polls it back out, dispatches
/// it through the registry, and reports the result — the same round trip
/// `uw_client::run_poller` performs each cycle.
async fn run_task(
    sim: &SimulatedOrchestratorClient,
    registry: &HandlerRegistry,
    task_type: &str,
    task_input: Map<String, Value>,
) -> TaskResult {
    sim.submit(task_type, task_input).await;
    let task = sim
        .poll_task(task_type, "e2e-worker")
        .await
        .unwrap()
        .expect("task was just submitted");
    let result = registry.dispatch(task).await;
    sim.submit_task_result(&result).await.unwrap();
    result
}

fn rfc3339_days_from_now(s: &str) -> i64 {
    let then = chrono::DateTime::parse_from_rfc3339(s).unwrap();
    (then.with_timezone(&chrono::Utc) - chrono::Utc::now()).num_hours() / 24
}

// S1: clean application, synthesized defaults throughout. credit_score=720
// and credit_utilization=0.25 fall out of `CreditReport::synthesize`, which
// is exactly spec.md's scenario input, so no repository overrides are
// needed to drive it. The component weights on these particular synthesized
// defaults bucket to `RiskLevel::Low` rather than the narrative's "medium"
// (overall_score works out to 10.0, under `RISK_MEDIUM_MIN`); see
// DESIGN.md for why the test asserts the pipeline's actual low-risk/approved
// output rather than the narrative's conditional branch, which is covered
// directly (with an explicitly seeded risk level) by
// `uw-decision/src/handler.rs`'s `medium_risk_produces_conditional_decision`.
#[tokio::test]
async fn s1_clean_application_chains_through_to_approval() {
    let repo = Arc::new(InMemoryRepository::new());
    // `underwriting_decision` and `update_application_state` have no
    // synthesize-on-miss fallback for the application itself (unlike credit
    // report / income verification / risk assessment, which each write their
    // own resolved state back as they run) — it must already be on file.
    repo.put_application(LoanApplication::synthesize("APP-12345", "USER-67890"))
        .await
        .unwrap();
    let sim = SimulatedOrchestratorClient::new();
    let registry = full_registry(repo.clone());

    let app_input = input(&[("applicationId", "APP-12345"), ("userId", "USER-67890")]);

    let credit = run_task(&sim, &registry, "credit_check", app_input.clone()).await;
    assert_eq!(credit.status, ResultStatus::Completed);
    assert_eq!(credit.output_data["creditDecision"]["approved"], json!(true));

    let income = run_task(&sim, &registry, "income_verification", app_input.clone()).await;
    assert_eq!(income.status, ResultStatus::Completed);
    assert_eq!(income.output_data["verificationStatus"], json!("verified"));

    let risk = run_task(&sim, &registry, "risk_assessment", app_input.clone()).await;
    assert_eq!(risk.status, ResultStatus::Completed);
    assert_eq!(risk.output_data["overallRiskLevel"], json!("low"));
    let overall_score = risk.output_data["overallScore"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&overall_score));
    let pod = risk.output_data["probabilityOfDefault"].as_f64().unwrap();
    assert!((0.0..=0.30).contains(&pod));

    let decision = run_task(&sim, &registry, "underwriting_decision", app_input.clone()).await;
    assert_eq!(decision.status, ResultStatus::Completed);
    assert_eq!(decision.output_data["decision"], json!("approved"));
    assert_eq!(decision.output_data["approvedAmount"], json!(25_000.0));

    let rate = decision.output_data["interestRate"].as_f64().unwrap();
    assert!((5.0..=25.0).contains(&rate));

    let monthly = decision.output_data["monthlyPayment"].as_f64().unwrap();
    let total_payment = decision.output_data["totalPayment"].as_f64().unwrap();
    let total_interest = decision.output_data["totalInterest"].as_f64().unwrap();
    let approved_term = decision.output_data["approvedTerm"].as_u64().unwrap() as f64;
    assert!((monthly * approved_term - total_payment).abs() < 0.02);
    assert!((total_payment - 25_000.0 - total_interest).abs() < 0.02);

    let expiration = decision.output_data["offerExpirationDate"].as_str().unwrap();
    assert_eq!(rfc3339_days_from_now(expiration), 7);

    let mut state_input = app_input.clone();
    state_input.insert("newState".into(), json!("approved"));
    let state = run_task(&sim, &registry, "update_application_state", state_input).await;
    assert_eq!(state.status, ResultStatus::Completed);
    assert_eq!(state.output_data["previousState"], json!("credit_check_in_progress"));
    assert_eq!(state.output_data["newState"], json!("approved"));
}

// S2: credit_score overridden to 550, below the policy floor of 580 — denied
// at credit_check with an explicit reason, and denied again downstream at
// underwriting_decision via the policy hard-limit check.
#[tokio::test]
async fn s2_low_credit_score_is_denied_end_to_end() {
    let repo = Arc::new(InMemoryRepository::new());
    repo.put_application(LoanApplication::synthesize("APP-1", "USER-1"))
        .await
        .unwrap();
    let mut report = CreditReport::synthesize().enrich();
    report.credit_score = 550;
    repo.put_credit_report("APP-1", report).await.unwrap();
    let registry = full_registry(repo.clone());
    let sim = SimulatedOrchestratorClient::new();

    let app_input = input(&[("applicationId", "APP-1"), ("userId", "USER-1")]);

    let credit = run_task(&sim, &registry, "credit_check", app_input.clone()).await;
    assert_eq!(credit.output_data["creditDecision"]["approved"], json!(false));
    let reasons = credit.output_data["creditDecision"]["reasons"].as_array().unwrap();
    assert!(reasons.iter().any(|r| r.as_str().unwrap().contains("below minimum")));

    run_task(&sim, &registry, "income_verification", app_input.clone()).await;
    run_task(&sim, &registry, "risk_assessment", app_input.clone()).await;

    let decision = run_task(&sim, &registry, "underwriting_decision", app_input).await;
    assert_eq!(decision.output_data["decision"], json!("denied"));
    let reasons = decision.output_data["decisionReasons"].as_array().unwrap();
    assert!(reasons.iter().any(|r| r.as_str().unwrap().contains("credit score")));
}

// S3: credit_score=700 but credit_utilization=0.85, over the 80% cap.
#[tokio::test]
async fn s3_high_utilization_is_rejected() {
    let repo = Arc::new(InMemoryRepository::new());
    let mut report = CreditReport::synthesize().enrich();
    report.credit_score = 700;
    report.credit_utilization = 0.85;
    repo.put_credit_report("APP-1", report).await.unwrap();
    let registry = full_registry(repo);
    let sim = SimulatedOrchestratorClient::new();

    let credit = run_task(
        &sim,
        &registry,
        "credit_check",
        input(&[("applicationId", "APP-1"), ("userId", "USER-1")]),
    )
    .await;

    assert_eq!(credit.output_data["creditDecision"]["approved"], json!(false));
    let reasons = credit.output_data["creditDecision"]["reasons"].as_array().unwrap();
    assert!(reasons.iter().any(|r| r.as_str().unwrap().contains("80.0%")));
}

// S4: empty userId handed to income_verification fails with a precise
// message instead of silently synthesizing a user.
#[tokio::test]
async fn s4_empty_user_id_fails_income_verification() {
    let registry = full_registry(Arc::new(InMemoryRepository::new()));
    let sim = SimulatedOrchestratorClient::new();

    let result = run_task(
        &sim,
        &registry,
        "income_verification",
        input(&[("applicationId", "APP-1"), ("userId", "")]),
    )
    .await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert_eq!(
        result.reason_for_incompletion.as_deref(),
        Some("user ID is required and must be a non-empty string")
    );
}

// S5: repeated polls against an orchestrator with nothing queued return no
// task and dispatch nothing — the "204" case `SimulatedOrchestratorClient`
// models by simply returning `Ok(None)` when its queue is empty.
#[tokio::test]
async fn s5_polling_with_no_pending_tasks_dispatches_nothing() {
    let registry = full_registry(Arc::new(InMemoryRepository::new()));
    let sim = SimulatedOrchestratorClient::new();

    for task_type in ["credit_check", "income_verification", "risk_assessment"] {
        let polled = sim.poll_task(task_type, "e2e-worker").await.unwrap();
        assert!(polled.is_none());
    }

    // Nothing was ever submitted, so the registry has nothing to dispatch
    // and no result should appear in the store for any task id.
    let _ = &registry;
    assert!(sim.result_for("sim-task-1").await.is_none());
}

// S6: orchestrator unreachable at startup — the worker falls back to
// `SimulatedOrchestratorClient::start_workflow`, which synthesizes the five
// canonical tasks in-process; they run to completion without any real HTTP
// endpoint involved.
#[tokio::test]
async fn s6_simulated_workflow_runs_all_canonical_tasks() {
    let repo = Arc::new(InMemoryRepository::new());
    repo.put_application(LoanApplication::synthesize("APP-99", "USER-99"))
        .await
        .unwrap();
    let registry = full_registry(repo);
    let sim = SimulatedOrchestratorClient::new();

    let workflow_input = input(&[("applicationId", "APP-99"), ("userId", "USER-99")]);
    let workflow_id = sim
        .start_workflow("underwriting_workflow", workflow_input)
        .await
        .unwrap();

    for task_type in [
        "credit_check",
        "income_verification",
        "risk_assessment",
        "underwriting_decision",
        "update_application_state",
    ] {
        let task = sim
            .poll_task(task_type, "e2e-worker")
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("expected a queued {task_type} task"));
        assert_eq!(task.workflow_instance_id.0, workflow_id);
        let result = registry.dispatch(task).await;
        sim.submit_task_result(&result).await.unwrap();
    }

    let status = sim.get_workflow_status(&workflow_id).await.unwrap();
    let tasks = status["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 5);
    assert!(tasks.iter().all(|t| t["status"] == json!("COMPLETED")));
}
