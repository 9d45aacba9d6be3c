use serde::{Deserialize, Serialize};

/// Optional overrides loaded from a JSON policy file at startup. Any field
/// left `None` falls back to the corresponding value in
/// [`crate::default_policy`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyOverrides {
    pub min_credit_score: Option<i32>,
    pub max_dti_ratio: Option<f64>,
    pub min_annual_income: Option<f64>,
    pub min_loan_amount: Option<f64>,
    pub max_loan_amount: Option<f64>,
    pub policy_version: Option<String>,
}

/// Load policy overrides from a JSON file. Absence of the file is not an
/// error — callers fall back to `PolicyOverrides::default()` (no overrides).
pub fn load_overrides(path: &std::path::Path) -> Result<PolicyOverrides, serde_json::Error> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents),
        Err(_) => Ok(PolicyOverrides::default()),
    }
}
