//! Interest-rate matrix and counter-offer terms (spec.md §4.7.1, §4.7.2).
//!
//! The matrix rate for a credit-score range is `rate_ranges[range].min_rate`
//! shifted by the risk-level adjustment, clamped to `[MIN_INTEREST_RATE,
//! MAX_INTEREST_RATE]` and rounded to 2 decimals. `policy.base_rate` is the
//! matrix's un-adjusted floor and is used only when a range is absent from
//! the policy's table.

use uw_core::{
    round_money, CreditScoreRange, InterestRateMatrix, RiskLevel, Timestamp, MAX_INTEREST_RATE,
    MIN_INTEREST_RATE, OFFER_EXPIRATION_DAYS,
};

pub fn matrix_rate(matrix: &InterestRateMatrix, credit_range: CreditScoreRange, risk_level: RiskLevel) -> f64 {
    let base = matrix
        .rate_ranges
        .get(&credit_range.to_string())
        .map(|r| r.min_rate)
        .unwrap_or(matrix.base_rate);

    let adjustment = matrix
        .risk_adjustments
        .get(&risk_level.to_string())
        .copied()
        .unwrap_or(0.0);

    round_money((base + adjustment).clamp(MIN_INTEREST_RATE, MAX_INTEREST_RATE))
}

pub struct CounterOffer {
    pub amount: f64,
    pub rate: f64,
}

/// Amount = requested × 0.70, only if it still clears the policy floor;
/// rate = matrix rate + 2.0 points (spec.md §4.7.2).
pub fn counter_offer(requested_amount: f64, min_loan_amount: f64, matrix_rate: f64) -> Option<CounterOffer> {
    let amount = round_money(requested_amount * 0.70);
    if amount < min_loan_amount {
        return None;
    }
    Some(CounterOffer {
        amount,
        rate: round_money(matrix_rate + 2.0),
    })
}

pub fn offer_expiration(now: Timestamp) -> Timestamp {
    now + chrono::Duration::days(OFFER_EXPIRATION_DAYS)
}
