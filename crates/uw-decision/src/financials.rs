//! Loan financial computations (spec.md §4.7 step 5).

use uw_core::round_money;

pub struct Financials {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// `P × r / (1 - (1+r)^(-n))`, falling back to `P/n` at a zero rate.
pub fn compute(principal: f64, annual_rate_percent: f64, term_months: u32) -> Financials {
    let r = annual_rate_percent / 100.0 / 12.0;
    let n = term_months as f64;

    let monthly_payment = if r == 0.0 {
        principal / n
    } else {
        principal * r / (1.0 - (1.0 + r).powf(-n))
    };

    let monthly_payment = round_money(monthly_payment);
    let total_payment = round_money(monthly_payment * n);
    let total_interest = round_money(total_payment - principal);

    Financials {
        monthly_payment,
        total_payment,
        total_interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_splits_principal_evenly() {
        let f = compute(12_000.0, 0.0, 12);
        assert_eq!(f.monthly_payment, 1_000.0);
        assert_eq!(f.total_interest, 0.0);
    }

    #[test]
    fn total_payment_equals_monthly_times_term() {
        let f = compute(25_000.0, 8.0, 60);
        assert!((f.total_payment - f.monthly_payment * 60.0).abs() < 0.01);
    }

    #[test]
    fn total_interest_is_positive_at_nonzero_rate() {
        let f = compute(25_000.0, 8.0, 60);
        assert!(f.total_interest > 0.0);
    }
}
