//! Rule-based credit decision (spec.md §4.4 step 4).

use uw_core::{CreditReport, RiskLevel};

#[derive(Clone, Debug, PartialEq)]
pub struct CreditDecision {
    pub approved: bool,
    pub manual_review_required: bool,
    pub reasons: Vec<String>,
    pub recommendations: Vec<String>,
}

fn recommendations_for(risk_level: RiskLevel) -> Vec<String> {
    match risk_level {
        RiskLevel::Low => vec!["eligible for best available rate".to_string()],
        RiskLevel::Medium => vec!["standard rate, no additional conditions".to_string()],
        RiskLevel::High => vec!["elevated rate, consider a co-signer".to_string()],
        RiskLevel::Critical => vec!["manual underwriter review recommended".to_string()],
    }
}

/// Applies the fixed rule order from spec.md §4.4 step 4: reject on hard
/// limits first, then flag for manual review, then approve by default.
pub fn decide(report: &CreditReport, risk_level: RiskLevel) -> CreditDecision {
    let mut reasons = Vec::new();
    let mut approved = true;
    let mut manual_review_required = false;

    if report.credit_score < 580 {
        approved = false;
        reasons.push(format!(
            "credit score {} is below minimum required score of 580",
            report.credit_score
        ));
    }

    if report.derogatory_counts.bankruptcies > 0 {
        manual_review_required = true;
        reasons.push("bankruptcy present on credit report".to_string());
    }

    if report.credit_utilization > 0.80 {
        approved = false;
        reasons.push(format!(
            "credit utilization {:.1}% exceeds the 80.0% maximum",
            report.credit_utilization * 100.0
        ));
    }

    if report.payment_history.delinquencies() > 5 {
        approved = false;
        reasons.push("more than 5 delinquent payments on record".to_string());
    }

    if risk_level == RiskLevel::Critical {
        manual_review_required = true;
        reasons.push("overall risk level is critical".to_string());
    }

    let recommendations = if approved && !manual_review_required {
        recommendations_for(risk_level)
    } else {
        Vec::new()
    };

    CreditDecision {
        approved,
        manual_review_required,
        reasons,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(score: i32, utilization: f64) -> CreditReport {
        let mut r = CreditReport::synthesize();
        r.credit_score = score;
        r.credit_utilization = utilization;
        r
    }

    #[test]
    fn clean_report_approves_with_recommendations() {
        let decision = decide(&report_with(720, 0.25), RiskLevel::Medium);
        assert!(decision.approved);
        assert!(!decision.manual_review_required);
        assert!(!decision.recommendations.is_empty());
    }

    #[test]
    fn low_score_is_rejected_with_below_minimum_reason() {
        let decision = decide(&report_with(550, 0.25), RiskLevel::Medium);
        assert!(!decision.approved);
        assert!(decision.reasons.iter().any(|r| r.contains("below minimum")));
    }

    #[test]
    fn high_utilization_is_rejected_mentioning_max_percentage() {
        let decision = decide(&report_with(700, 0.85), RiskLevel::Low);
        assert!(!decision.approved);
        assert!(decision.reasons.iter().any(|r| r.contains("80.0%")));
    }

    #[test]
    fn bankruptcy_forces_manual_review_without_blocking_approval() {
        let mut report = report_with(700, 0.25);
        report.derogatory_counts.bankruptcies = 1;
        let decision = decide(&report, RiskLevel::Low);
        assert!(decision.manual_review_required);
    }

    #[test]
    fn excessive_delinquencies_are_rejected() {
        let mut report = report_with(700, 0.25);
        report.payment_history.late_30 = 3;
        report.payment_history.late_60 = 3;
        let decision = decide(&report, RiskLevel::Low);
        assert!(!decision.approved);
    }

    #[test]
    fn critical_risk_forces_manual_review() {
        let decision = decide(&report_with(700, 0.25), RiskLevel::Critical);
        assert!(decision.manual_review_required);
        assert!(decision.recommendations.is_empty());
    }
}
