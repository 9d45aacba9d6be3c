//! Policy compliance check (spec.md §4.7 step 2). Hard-limit violations are
//! terminal: any one of them produces a `denied` decision before risk-level
//! branching is even considered.

use uw_core::{LoanApplication, UnderwritingPolicy};

fn score_violation(credit_score: i32, policy: &UnderwritingPolicy) -> Option<String> {
    if credit_score < policy.min_credit_score {
        Some(format!(
            "credit score {} is below the policy minimum of {}",
            credit_score, policy.min_credit_score
        ))
    } else {
        None
    }
}

fn dti_violation(application: &LoanApplication, policy: &UnderwritingPolicy) -> Option<String> {
    let dti = application.dti();
    if dti > policy.max_dti_ratio {
        Some(format!(
            "debt-to-income ratio {:.2} exceeds the policy maximum of {:.2}",
            dti, policy.max_dti_ratio
        ))
    } else {
        None
    }
}

fn income_violation(application: &LoanApplication, policy: &UnderwritingPolicy) -> Option<String> {
    if application.annual_income < policy.min_annual_income {
        Some(format!(
            "annual income {:.2} is below the policy minimum of {:.2}",
            application.annual_income, policy.min_annual_income
        ))
    } else {
        None
    }
}

fn loan_amount_violation(application: &LoanApplication, policy: &UnderwritingPolicy) -> Option<String> {
    if application.loan_amount < policy.min_loan_amount || application.loan_amount > policy.max_loan_amount {
        Some(format!(
            "loan amount {:.2} is outside the allowed range [{:.2}, {:.2}]",
            application.loan_amount, policy.min_loan_amount, policy.max_loan_amount
        ))
    } else {
        None
    }
}

/// All four hard limits: credit score, DTI, annual income, loan amount
/// range. Used by `underwriting_decision` (spec.md §4.7 step 2).
pub fn violations(application: &LoanApplication, credit_score: i32, policy: &UnderwritingPolicy) -> Vec<String> {
    [
        score_violation(credit_score, policy),
        dti_violation(application, policy),
        income_violation(application, policy),
        loan_amount_violation(application, policy),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Just the credit-score and DTI limits, the two checks
/// `policy_compliance_check` rechecks standalone (spec.md §4.9) — it does
/// not recheck income or loan-amount range.
pub fn score_and_dti_violations(
    application: &LoanApplication,
    credit_score: i32,
    policy: &UnderwritingPolicy,
) -> Vec<String> {
    [score_violation(credit_score, policy), dti_violation(application, policy)]
        .into_iter()
        .flatten()
        .collect()
}
