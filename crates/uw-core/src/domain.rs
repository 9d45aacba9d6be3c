//! uw-core::domain
//!
//! Domain entities consumed by handlers (spec.md §3). Opaque to the
//! orchestrator — these only ever appear inside a handler's `output_data`
//! map or a repository capability's return value.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CREDIT_SCORE_EXCELLENT_MIN, CREDIT_SCORE_FAIR_MIN, CREDIT_SCORE_GOOD_MIN,
    CREDIT_SCORE_VERY_GOOD_MIN, RISK_CRITICAL_MIN, RISK_HIGH_MIN, RISK_MEDIUM_MIN,
};
use crate::types::{CreditScoreRange, Decision, RiskLevel, Timestamp, VerificationStatus};

/// Derive the credit-score-range bucket for a raw score (spec.md §3
/// invariant: total, deterministic on score input).
pub fn credit_score_range(score: i32) -> CreditScoreRange {
    if score >= CREDIT_SCORE_EXCELLENT_MIN {
        CreditScoreRange::Excellent
    } else if score >= CREDIT_SCORE_VERY_GOOD_MIN {
        CreditScoreRange::VeryGood
    } else if score >= CREDIT_SCORE_GOOD_MIN {
        CreditScoreRange::Good
    } else if score >= CREDIT_SCORE_FAIR_MIN {
        CreditScoreRange::Fair
    } else {
        CreditScoreRange::Poor
    }
}

/// Derive the risk-level bucket for an overall 0-100 risk score (spec.md §3
/// invariant).
pub fn risk_level_from_score(overall_score: f64) -> RiskLevel {
    if overall_score >= RISK_CRITICAL_MIN {
        RiskLevel::Critical
    } else if overall_score >= RISK_HIGH_MIN {
        RiskLevel::High
    } else if overall_score >= RISK_MEDIUM_MIN {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

// ── LoanApplication ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: String,
    pub user_id: String,
    pub loan_amount: f64,
    pub requested_term_months: u32,
    pub loan_purpose: String,
    pub annual_income: f64,
    pub monthly_income: f64,
    pub monthly_debt_payments: f64,
    pub employment_status: String,
    pub income_verification_status: VerificationStatus,
    pub current_state: String,
}

impl LoanApplication {
    /// Debt-to-income ratio (spec.md GLOSSARY: DTI).
    pub fn dti(&self) -> f64 {
        if self.monthly_income <= 0.0 {
            return 1.0;
        }
        self.monthly_debt_payments / self.monthly_income
    }

    /// Deterministic stub used when the repository capability is absent
    /// (spec.md §4.4 step 1).
    pub fn synthesize(application_id: &str, user_id: &str) -> Self {
        Self {
            id: application_id.to_string(),
            user_id: user_id.to_string(),
            loan_amount: 25_000.0,
            requested_term_months: 60,
            loan_purpose: "debt_consolidation".to_string(),
            annual_income: 65_000.0,
            monthly_income: 65_000.0 / 12.0,
            monthly_debt_payments: 800.0,
            employment_status: "employed".to_string(),
            income_verification_status: VerificationStatus::Unverified,
            current_state: "credit_check_in_progress".to_string(),
        }
    }
}

// ── CreditReport ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PaymentHistory {
    pub on_time: u32,
    pub late_30: u32,
    pub late_60: u32,
    pub late_90: u32,
    pub late_120_plus: u32,
    pub charge_offs: u32,
    pub collections: u32,
}

impl PaymentHistory {
    pub fn delinquencies(&self) -> u32 {
        self.late_30 + self.late_60 + self.late_90
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DerogatoryCounts {
    pub bankruptcies: u32,
    pub liens: u32,
    pub judgments: u32,
    pub charge_offs: u32,
    pub collections: u32,
}

impl DerogatoryCounts {
    pub fn total(&self) -> u32 {
        self.bankruptcies + self.liens + self.judgments + self.charge_offs + self.collections
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreditAccount {
    pub account_type: String,
    pub balance: f64,
    pub credit_limit: f64,
    pub opened_date: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreditInquiry {
    pub hard: bool,
    pub date: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreditReport {
    pub credit_score: i32,
    pub credit_score_range: CreditScoreRange,
    pub credit_utilization: f64,
    pub total_credit_limit: f64,
    pub total_current_balance: f64,
    pub payment_history: PaymentHistory,
    pub derogatory_counts: DerogatoryCounts,
    pub credit_accounts: Vec<CreditAccount>,
    pub credit_inquiries: Vec<CreditInquiry>,
    pub public_records: u32,
    pub credit_mix: HashSet<String>,
    pub report_date: Timestamp,
}

impl CreditReport {
    /// Deterministic mock used when the credit-bureau capability is absent
    /// (spec.md §4.4 step 2).
    pub fn synthesize() -> Self {
        let score = 720;
        Self {
            credit_score: score,
            credit_score_range: credit_score_range(score),
            credit_utilization: 0.25,
            total_credit_limit: 40_000.0,
            total_current_balance: 10_000.0,
            payment_history: PaymentHistory {
                on_time: 48,
                late_30: 0,
                late_60: 0,
                late_90: 0,
                late_120_plus: 0,
                charge_offs: 0,
                collections: 0,
            },
            derogatory_counts: DerogatoryCounts::default(),
            credit_accounts: Vec::new(),
            credit_inquiries: Vec::new(),
            public_records: 0,
            credit_mix: ["revolving".to_string(), "installment".to_string()]
                .into_iter()
                .collect(),
            report_date: chrono::Utc::now(),
        }
    }

    /// Fill in a missing `credit_utilization` from balance/limit, and
    /// `credit_score_range` from `credit_score` (spec.md §4.4 step 2 "enrich").
    pub fn enrich(mut self) -> Self {
        if self.credit_utilization == 0.0 && self.total_credit_limit > 0.0 {
            self.credit_utilization = self.total_current_balance / self.total_credit_limit;
        }
        self.credit_score_range = credit_score_range(self.credit_score);
        self
    }

    pub fn is_fresh(&self, max_age_days: i64) -> bool {
        let age = chrono::Utc::now() - self.report_date;
        age <= chrono::Duration::days(max_age_days)
    }
}

// ── RiskAssessment ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RiskComponentScores {
    pub credit: f64,
    pub income: f64,
    pub debt: f64,
    pub fraud: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_level: RiskLevel,
    pub overall_score: f64,
    pub component_scores: RiskComponentScores,
    pub risk_factors: Vec<String>,
    pub mitigating_factors: Vec<String>,
    pub probability_of_default: f64,
    pub model_version: String,
    pub confidence_level: f64,
    pub assessed_at: Timestamp,
}

impl RiskAssessment {
    pub fn is_fresh(&self, max_age_hours: i64) -> bool {
        let age = chrono::Utc::now() - self.assessed_at;
        age <= chrono::Duration::hours(max_age_hours)
    }
}

// ── IncomeVerification ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncomeVerification {
    pub verification_status: VerificationStatus,
    pub verified_annual_income: f64,
    pub verified_monthly_income: f64,
    pub employer_name: String,
    pub employment_start_date: Timestamp,
    pub employment_type: String,
    pub pay_frequency: String,
    pub documents_provided: Vec<String>,
}

// ── UnderwritingResult ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub due_date: Timestamp,
    #[serde(rename = "type")]
    pub condition_type: String,
    pub priority: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CounterOfferTerms {
    pub amount: f64,
    pub rate: f64,
    pub expiration_date: Timestamp,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnderwritingResult {
    pub decision: Decision,
    pub approved_amount: Option<f64>,
    pub approved_term: Option<u32>,
    pub interest_rate: Option<f64>,
    pub apr: Option<f64>,
    pub monthly_payment: Option<f64>,
    pub total_interest: Option<f64>,
    pub total_payment: Option<f64>,
    pub conditions: Vec<Condition>,
    pub decision_reasons: Vec<String>,
    pub counter_offer_terms: Option<CounterOfferTerms>,
    pub automated_decision: bool,
    pub manual_review_required: bool,
    pub offer_expiration_date: Timestamp,
    pub processing_time: f64,
}

// ── UnderwritingPolicy ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateRange {
    pub min_rate: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InterestRateMatrix {
    pub base_rate: f64,
    /// Keyed by `CreditScoreRange::to_string()` (e.g. "good").
    pub rate_ranges: std::collections::HashMap<String, RateRange>,
    /// Keyed by `RiskLevel::to_string()` (e.g. "medium"); percentage-point
    /// adjustment applied on top of the range-derived rate.
    pub risk_adjustments: std::collections::HashMap<String, f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnderwritingPolicy {
    pub min_credit_score: i32,
    pub max_dti_ratio: f64,
    pub min_annual_income: f64,
    pub min_loan_amount: f64,
    pub max_loan_amount: f64,
    pub allowed_terms: Vec<u32>,
    pub allowed_purposes: Vec<String>,
    pub interest_rate_matrix: InterestRateMatrix,
    pub auto_approval_thresholds: std::collections::HashMap<String, f64>,
    pub manual_review_triggers: Vec<String>,
    pub policy_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_score_range_buckets_are_total_and_deterministic() {
        assert_eq!(credit_score_range(820), CreditScoreRange::Excellent);
        assert_eq!(credit_score_range(760), CreditScoreRange::VeryGood);
        assert_eq!(credit_score_range(700), CreditScoreRange::Good);
        assert_eq!(credit_score_range(600), CreditScoreRange::Fair);
        assert_eq!(credit_score_range(400), CreditScoreRange::Poor);
        // Boundaries are inclusive on the lower bound of each bucket.
        assert_eq!(credit_score_range(800), CreditScoreRange::Excellent);
        assert_eq!(credit_score_range(799), CreditScoreRange::VeryGood);
    }

    #[test]
    fn risk_level_buckets_are_total_and_deterministic() {
        assert_eq!(risk_level_from_score(85.0), RiskLevel::Critical);
        assert_eq!(risk_level_from_score(65.0), RiskLevel::High);
        assert_eq!(risk_level_from_score(45.0), RiskLevel::Medium);
        assert_eq!(risk_level_from_score(10.0), RiskLevel::Low);
    }

    #[test]
    fn loan_application_dti_matches_glossary_definition() {
        let mut app = LoanApplication::synthesize("APP-1", "USER-1");
        app.monthly_income = 5_000.0;
        app.monthly_debt_payments = 1_500.0;
        assert!((app.dti() - 0.3).abs() < 1e-9);
    }
}
