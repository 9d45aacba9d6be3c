pub mod handler;
pub mod scoring;

pub use handler::RiskAssessmentHandler;
pub use scoring::{
    assess, credit_risk_score, debt_risk_score, fraud_risk_score, income_risk_score,
    AssessmentInputs,
};
