//! Pure risk-component scoring functions (spec.md §4.6). Each returns a
//! 0–100 value, higher meaning more risk; `assess` combines them with the
//! fixed component weights and derives the overall bucket.

use uw_core::{risk_level_from_score, CreditReport, RiskAssessment, RiskComponentScores, RiskLevel, VerificationStatus};

const WEIGHT_CREDIT: f64 = 0.4;
const WEIGHT_INCOME: f64 = 0.3;
const WEIGHT_DEBT: f64 = 0.2;
const WEIGHT_FRAUD: f64 = 0.1;

pub fn credit_risk_score(report: &CreditReport) -> f64 {
    let mut score = if report.credit_score >= 800 {
        5.0
    } else if report.credit_score >= 740 {
        10.0
    } else if report.credit_score >= 670 {
        20.0
    } else if report.credit_score >= 580 {
        35.0
    } else {
        50.0
    };

    score += if report.credit_utilization > 0.80 {
        20.0
    } else if report.credit_utilization > 0.50 {
        15.0
    } else if report.credit_utilization > 0.30 {
        10.0
    } else {
        0.0
    };

    score += 3.0 * report.payment_history.delinquencies() as f64;
    score += 10.0 * report.derogatory_counts.total() as f64;

    score.min(100.0)
}

pub fn income_risk_score(
    annual_income: f64,
    employment_status: &str,
    verification_status: VerificationStatus,
) -> f64 {
    let mut score = if annual_income < 25_000.0 {
        40.0
    } else if annual_income < 40_000.0 {
        20.0
    } else if annual_income < 60_000.0 {
        10.0
    } else {
        0.0
    };

    score += match employment_status {
        "unemployed" => 50.0,
        "part_time" => 30.0,
        "self_employed" => 20.0,
        "retired" => 15.0,
        _ => 0.0,
    };

    score += match verification_status {
        VerificationStatus::Failed => 30.0,
        VerificationStatus::Unverified => 20.0,
        _ => 0.0,
    };

    score.min(100.0)
}

pub fn debt_risk_score(dti: f64) -> f64 {
    if dti > 0.50 {
        80.0
    } else if dti > 0.43 {
        60.0
    } else if dti > 0.36 {
        40.0
    } else if dti > 0.28 {
        20.0
    } else {
        10.0
    }
}

pub fn fraud_risk_score(loan_amount: f64, annual_income: f64) -> f64 {
    if annual_income <= 0.0 {
        return 20.0;
    }
    let ratio = loan_amount / annual_income;
    if ratio > 2.0 {
        20.0
    } else if ratio > 1.0 {
        10.0
    } else {
        0.0
    }
}

pub struct AssessmentInputs<'a> {
    pub credit_report: &'a CreditReport,
    pub annual_income: f64,
    pub employment_status: &'a str,
    pub verification_status: VerificationStatus,
    pub dti: f64,
    pub loan_amount: f64,
    pub model_version: &'a str,
    pub assessed_at: uw_core::Timestamp,
}

pub fn assess(inputs: &AssessmentInputs) -> RiskAssessment {
    let credit = credit_risk_score(inputs.credit_report);
    let income = income_risk_score(
        inputs.annual_income,
        inputs.employment_status,
        inputs.verification_status,
    );
    let debt = debt_risk_score(inputs.dti);
    let fraud = fraud_risk_score(inputs.loan_amount, inputs.annual_income);

    let overall_score =
        credit * WEIGHT_CREDIT + income * WEIGHT_INCOME + debt * WEIGHT_DEBT + fraud * WEIGHT_FRAUD;
    let overall_risk_level = risk_level_from_score(overall_score);

    let mut risk_factors = Vec::new();
    if inputs.credit_report.credit_score < 620 {
        risk_factors.push("credit score below 620".to_string());
    }
    if inputs.credit_report.credit_utilization > 0.7 {
        risk_factors.push("credit utilization above 70%".to_string());
    }
    if inputs.dti > 0.4 {
        risk_factors.push("debt-to-income ratio above 40%".to_string());
    }

    let mut mitigating_factors = Vec::new();
    if inputs.credit_report.credit_score >= 750 {
        mitigating_factors.push("credit score at or above 750".to_string());
    }
    if inputs.credit_report.payment_history.delinquencies() == 0 {
        mitigating_factors.push("strong payment history".to_string());
    }
    if inputs.verification_status == VerificationStatus::Verified {
        mitigating_factors.push("income verified".to_string());
    }

    let probability_of_default = (overall_score / 100.0 * 0.30).min(0.30);

    RiskAssessment {
        overall_risk_level,
        overall_score,
        component_scores: RiskComponentScores {
            credit,
            income,
            debt,
            fraud,
        },
        risk_factors,
        mitigating_factors,
        probability_of_default,
        model_version: inputs.model_version.to_string(),
        confidence_level: 0.85,
        assessed_at: inputs.assessed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uw_core::CreditReport as Report;

    fn report(score: i32, utilization: f64) -> Report {
        let mut r = Report::synthesize();
        r.credit_score = score;
        r.credit_utilization = utilization;
        r
    }

    #[test]
    fn credit_risk_score_rewards_high_scores() {
        assert_eq!(credit_risk_score(&report(820, 0.1)), 5.0);
        assert_eq!(credit_risk_score(&report(500, 0.1)), 50.0);
    }

    #[test]
    fn credit_risk_score_caps_at_100() {
        let mut r = report(400, 0.9);
        r.payment_history.late_30 = 20;
        r.derogatory_counts.bankruptcies = 5;
        assert_eq!(credit_risk_score(&r), 100.0);
    }

    #[test]
    fn debt_risk_score_buckets_match_spec() {
        assert_eq!(debt_risk_score(0.55), 80.0);
        assert_eq!(debt_risk_score(0.45), 60.0);
        assert_eq!(debt_risk_score(0.40), 40.0);
        assert_eq!(debt_risk_score(0.30), 20.0);
        assert_eq!(debt_risk_score(0.10), 10.0);
    }

    #[test]
    fn fraud_risk_score_flags_high_loan_to_income() {
        assert_eq!(fraud_risk_score(150_000.0, 50_000.0), 20.0);
        assert_eq!(fraud_risk_score(60_000.0, 50_000.0), 10.0);
        assert_eq!(fraud_risk_score(20_000.0, 50_000.0), 0.0);
    }

    #[test]
    fn probability_of_default_is_capped_at_point_three() {
        let inputs = AssessmentInputs {
            credit_report: &report(400, 0.9),
            annual_income: 10_000.0,
            employment_status: "unemployed",
            verification_status: VerificationStatus::Failed,
            dti: 0.9,
            loan_amount: 200_000.0,
            model_version: "v1",
            assessed_at: chrono::Utc::now(),
        };
        let assessment = assess(&inputs);
        assert!(assessment.probability_of_default <= 0.30);
        assert_eq!(assessment.overall_risk_level, RiskLevel::Critical);
    }
}
