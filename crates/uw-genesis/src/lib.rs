//! uw-genesis
//!
//! Builds the default underwriting policy the worker starts with — the
//! "genesis parameters" of the system: minimum credit score, DTI ceiling,
//! loan-amount bounds, the interest-rate matrix, and auto-approval /
//! manual-review thresholds. A deployment may layer `PolicyOverrides` (loaded
//! from a JSON file) on top at startup.

pub mod params;

pub use params::{load_overrides, PolicyOverrides};

use std::collections::HashMap;

use uw_core::{InterestRateMatrix, RateRange, UnderwritingPolicy};

/// The policy a fresh worker starts with absent any override file.
///
/// Rate bands mirror the standalone `calculate_interest_rate` auxiliary
/// handler's base-rate table (spec.md §4.9) so the two code paths agree
/// when a report's credit-score bucket matches.
pub fn default_policy() -> UnderwritingPolicy {
    let mut rate_ranges = HashMap::new();
    rate_ranges.insert("excellent".to_string(), RateRange { min_rate: 5.5 });
    rate_ranges.insert("very_good".to_string(), RateRange { min_rate: 6.5 });
    rate_ranges.insert("good".to_string(), RateRange { min_rate: 8.0 });
    rate_ranges.insert("fair".to_string(), RateRange { min_rate: 12.0 });
    rate_ranges.insert("poor".to_string(), RateRange { min_rate: 18.0 });

    let mut risk_adjustments = HashMap::new();
    risk_adjustments.insert("low".to_string(), -0.5);
    risk_adjustments.insert("medium".to_string(), 0.0);
    risk_adjustments.insert("high".to_string(), 2.0);
    risk_adjustments.insert("critical".to_string(), 5.0);

    let mut auto_approval_thresholds = HashMap::new();
    auto_approval_thresholds.insert("max_risk_score".to_string(), 40.0);

    UnderwritingPolicy {
        min_credit_score: 580,
        max_dti_ratio: 0.43,
        min_annual_income: 20_000.0,
        min_loan_amount: 1_000.0,
        max_loan_amount: 100_000.0,
        allowed_terms: vec![12, 24, 36, 48, 60, 72, 84],
        allowed_purposes: vec![
            "debt_consolidation".to_string(),
            "home_improvement".to_string(),
            "auto".to_string(),
            "medical".to_string(),
            "other".to_string(),
        ],
        interest_rate_matrix: InterestRateMatrix {
            base_rate: 9.0,
            rate_ranges,
            risk_adjustments,
        },
        auto_approval_thresholds,
        manual_review_triggers: vec![
            "unverified_income".to_string(),
            "high_dti".to_string(),
            "critical_risk".to_string(),
        ],
        policy_version: "v1".to_string(),
    }
}

/// Apply file-loaded overrides on top of the default policy.
pub fn apply_overrides(mut policy: UnderwritingPolicy, overrides: &PolicyOverrides) -> UnderwritingPolicy {
    if let Some(v) = overrides.min_credit_score {
        policy.min_credit_score = v;
    }
    if let Some(v) = overrides.max_dti_ratio {
        policy.max_dti_ratio = v;
    }
    if let Some(v) = overrides.min_annual_income {
        policy.min_annual_income = v;
    }
    if let Some(v) = overrides.min_loan_amount {
        policy.min_loan_amount = v;
    }
    if let Some(v) = overrides.max_loan_amount {
        policy.max_loan_amount = v;
    }
    if let Some(v) = &overrides.policy_version {
        policy.policy_version = v.clone();
    }
    policy
}
