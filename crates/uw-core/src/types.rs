use serde::{Deserialize, Serialize};
use std::fmt;

/// UTC timestamp used throughout the worker — task receipt times, cache
/// freshness checks, offer expirations.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque orchestrator-assigned identifier. Newtyped for clarity at call
/// sites; carries no validation beyond non-emptiness (checked where parsed).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Orchestrator-assigned workflow instance identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowInstanceId(pub String);

impl fmt::Display for WorkflowInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for WorkflowInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkflowInstanceId({})", self.0)
    }
}

impl From<String> for WorkflowInstanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── Bucketed classifications ──────────────────────────────────────────────────

/// Deterministic bucket derived from a raw FICO-style credit score.
/// See `uw_core::domain::credit_score_range`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditScoreRange {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl fmt::Display for CreditScoreRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CreditScoreRange::Excellent => "excellent",
            CreditScoreRange::VeryGood => "very_good",
            CreditScoreRange::Good => "good",
            CreditScoreRange::Fair => "fair",
            CreditScoreRange::Poor => "poor",
        };
        write!(f, "{s}")
    }
}

/// Risk bucket derived from a 0-100 overall risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Verification outcome for income verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Partial,
    Unverified,
    Failed,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Partial => "partial",
            VerificationStatus::Unverified => "unverified",
            VerificationStatus::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Final underwriting decision branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Denied,
    Conditional,
    ManualReview,
    CounterOffer,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Approved => "approved",
            Decision::Denied => "denied",
            Decision::Conditional => "conditional",
            Decision::ManualReview => "manual_review",
            Decision::CounterOffer => "counter_offer",
        };
        write!(f, "{s}")
    }
}

/// Round a monetary amount to 2 decimal places (spec.md §3 invariant).
pub fn round_money(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
