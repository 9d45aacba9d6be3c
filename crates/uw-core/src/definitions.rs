//! uw-core::definitions
//!
//! Metadata registered with the orchestrator at startup: task definitions
//! (timeouts, retry policy, i/o key shapes) and the canonical workflow
//! definition that chains the five core tasks together.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Orchestrator metadata for one task type.
///
/// Invariant (spec.md §8): `response_timeout_seconds < timeout_seconds`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    pub description: String,
    pub timeout_seconds: u64,
    pub response_timeout_seconds: u64,
    pub retry_count: u32,
    pub input_keys: Vec<String>,
    pub output_keys: Vec<String>,
}

impl TaskDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        timeout_seconds: u64,
        response_timeout_seconds: u64,
        retry_count: u32,
        input_keys: &[&str],
        output_keys: &[&str],
    ) -> Self {
        debug_assert!(
            response_timeout_seconds < timeout_seconds,
            "response_timeout_seconds must be < timeout_seconds"
        );
        Self {
            name: name.into(),
            description: description.into(),
            timeout_seconds,
            response_timeout_seconds,
            retry_count,
            input_keys: input_keys.iter().map(|s| s.to_string()).collect(),
            output_keys: output_keys.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True iff the timeout invariant holds. Checked before registration.
    pub fn is_valid(&self) -> bool {
        self.response_timeout_seconds < self.timeout_seconds
    }
}

/// One step in a [`WorkflowDefinition`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowTask {
    pub name: String,
    pub task_reference_name: String,
    #[serde(rename = "type")]
    pub task_type: String,
    /// Values may reference `${workflow.input.X}` or `${<task_ref>.output.Y}`.
    pub input_parameters: HashMap<String, Value>,
}

/// Orchestrator metadata describing an ordered sequence of tasks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub description: String,
    pub version: u32,
    pub schema_version: u32,
    pub tasks: Vec<WorkflowTask>,
    pub input_parameters: Vec<String>,
    pub output_parameters: HashMap<String, Value>,
}

/// The canonical five-step underwriting pipeline (spec.md §6.3).
pub fn underwriting_workflow_definition() -> WorkflowDefinition {
    fn step(name: &str, ref_name: &str, params: &[(&str, &str)]) -> WorkflowTask {
        WorkflowTask {
            name: name.to_string(),
            task_reference_name: ref_name.to_string(),
            task_type: name.to_string(),
            input_parameters: params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        }
    }

    let tasks = vec![
        step(
            "credit_check",
            "credit_check_task",
            &[
                ("applicationId", "${workflow.input.applicationId}"),
                ("userId", "${workflow.input.userId}"),
            ],
        ),
        step(
            "income_verification",
            "income_verification_task",
            &[
                ("applicationId", "${workflow.input.applicationId}"),
                ("userId", "${workflow.input.userId}"),
            ],
        ),
        step(
            "risk_assessment",
            "risk_assessment_task",
            &[
                ("applicationId", "${workflow.input.applicationId}"),
                ("userId", "${workflow.input.userId}"),
            ],
        ),
        step(
            "underwriting_decision",
            "underwriting_decision_task",
            &[
                ("applicationId", "${workflow.input.applicationId}"),
                ("userId", "${workflow.input.userId}"),
            ],
        ),
        step(
            "update_application_state",
            "update_application_state_task",
            &[
                ("applicationId", "${workflow.input.applicationId}"),
                ("newState", "${underwriting_decision_task.output.decision}"),
            ],
        ),
    ];

    let mut output_parameters = HashMap::new();
    output_parameters.insert(
        "decision".to_string(),
        Value::String("${underwriting_decision_task.output.decision}".to_string()),
    );
    output_parameters.insert(
        "approvedAmount".to_string(),
        Value::String("${underwriting_decision_task.output.approved_amount}".to_string()),
    );
    output_parameters.insert(
        "interestRate".to_string(),
        Value::String("${underwriting_decision_task.output.interest_rate}".to_string()),
    );

    WorkflowDefinition {
        name: "underwriting_workflow".to_string(),
        description: "End-to-end underwriting decision pipeline".to_string(),
        version: 1,
        schema_version: 2,
        tasks,
        input_parameters: vec!["applicationId".to_string(), "userId".to_string()],
        output_parameters,
    }
}

/// The closed set of 13 task-type names (spec.md §6.2), in registration order.
pub const TASK_TYPE_NAMES: [&str; 13] = [
    "credit_check",
    "income_verification",
    "risk_assessment",
    "underwriting_decision",
    "update_application_state",
    "policy_compliance_check",
    "fraud_detection",
    "calculate_interest_rate",
    "final_approval",
    "process_denial",
    "assign_manual_review",
    "process_conditional_approval",
    "generate_counter_offer",
];

/// Build the default [`TaskDefinition`] set for all 13 task types.
pub fn default_task_definitions() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition::new(
            "credit_check",
            "Retrieve and analyze an applicant's credit report",
            60,
            30,
            2,
            &["applicationId", "userId"],
            &["creditScore", "creditDecision", "riskAnalysis"],
        ),
        TaskDefinition::new(
            "income_verification",
            "Verify an applicant's stated income and employment",
            60,
            30,
            2,
            &["applicationId", "userId", "verificationMethod"],
            &["verificationStatus", "verifiedIncome", "incomeAnalysis"],
        ),
        TaskDefinition::new(
            "risk_assessment",
            "Compute a multi-dimensional risk score for an application",
            60,
            30,
            2,
            &["applicationId", "userId"],
            &["overallRiskLevel", "overallScore", "riskFactors"],
        ),
        TaskDefinition::new(
            "underwriting_decision",
            "Produce the final underwriting decision and terms",
            90,
            45,
            1,
            &["applicationId", "userId"],
            &["decision", "approvedAmount", "interestRate"],
        ),
        TaskDefinition::new(
            "update_application_state",
            "Persist an application state transition",
            30,
            15,
            3,
            &["applicationId", "newState"],
            &["previousState", "newState"],
        ),
        TaskDefinition::new(
            "policy_compliance_check",
            "Recheck hard policy thresholds for an application",
            30,
            15,
            2,
            &["applicationId"],
            &["compliant", "violations"],
        ),
        TaskDefinition::new(
            "fraud_detection",
            "Score an application for fraud indicators",
            30,
            15,
            2,
            &["applicationId"],
            &["fraudScore", "fraudRiskLevel"],
        ),
        TaskDefinition::new(
            "calculate_interest_rate",
            "Derive the interest rate and APR for an application",
            30,
            15,
            2,
            &["applicationId"],
            &["interestRate", "apr"],
        ),
        TaskDefinition::new(
            "final_approval",
            "Finalize an approved loan and issue a loan number",
            30,
            15,
            2,
            &["applicationId"],
            &["loanNumber", "offerExpirationDate"],
        ),
        TaskDefinition::new(
            "process_denial",
            "Record denial reasons and adverse-action next steps",
            30,
            15,
            2,
            &["applicationId"],
            &["denialReasons", "nextSteps"],
        ),
        TaskDefinition::new(
            "assign_manual_review",
            "Assign an application to the next available underwriter",
            30,
            15,
            2,
            &["applicationId"],
            &["assignedTo", "priority", "dueBy"],
        ),
        TaskDefinition::new(
            "process_conditional_approval",
            "Carry conditional-approval conditions through to the applicant",
            30,
            15,
            2,
            &["applicationId"],
            &["conditions"],
        ),
        TaskDefinition::new(
            "generate_counter_offer",
            "Generate reduced-terms counter-offer",
            30,
            15,
            2,
            &["applicationId"],
            &["counterOfferAmount", "counterOfferRate"],
        ),
    ]
}
