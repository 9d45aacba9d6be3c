//! ─── Underwriting Worker Constants ──────────────────────────────────────────
//!
//! Thresholds and defaults that are stable across deployments. Policy values
//! that vary by environment (min credit score, rate matrix, ...) live in
//! `uw-genesis` instead — these are the ones the spec fixes outright.

// ── Credit score buckets ──────────────────────────────────────────────────────

pub const CREDIT_SCORE_EXCELLENT_MIN: i32 = 800;
pub const CREDIT_SCORE_VERY_GOOD_MIN: i32 = 740;
pub const CREDIT_SCORE_GOOD_MIN: i32 = 670;
pub const CREDIT_SCORE_FAIR_MIN: i32 = 580;

pub const CREDIT_SCORE_MIN: i32 = 300;
pub const CREDIT_SCORE_MAX: i32 = 850;

// ── Risk level buckets (overall_score 0-100) ──────────────────────────────────

pub const RISK_CRITICAL_MIN: f64 = 80.0;
pub const RISK_HIGH_MIN: f64 = 60.0;
pub const RISK_MEDIUM_MIN: f64 = 40.0;

// ── Risk component weights ────────────────────────────────────────────────────

pub const RISK_WEIGHT_CREDIT: f64 = 0.4;
pub const RISK_WEIGHT_INCOME: f64 = 0.3;
pub const RISK_WEIGHT_DEBT: f64 = 0.2;
pub const RISK_WEIGHT_FRAUD: f64 = 0.1;

pub const PROBABILITY_OF_DEFAULT_CAP: f64 = 0.30;

// ── Interest rate clamps ──────────────────────────────────────────────────────

pub const MIN_INTEREST_RATE: f64 = 5.0;
pub const MAX_INTEREST_RATE: f64 = 25.0;
pub const APR_SPREAD: f64 = 0.5;

// ── Offer / condition windows ─────────────────────────────────────────────────

pub const OFFER_EXPIRATION_DAYS: i64 = 7;
pub const CONDITIONAL_CONDITION_DUE_DAYS: i64 = 14;
pub const INCOME_VERIFICATION_CONDITION_DUE_DAYS: i64 = 7;
pub const MANUAL_REVIEW_DUE_HOURS: i64 = 24;

// ── Cache freshness ────────────────────────────────────────────────────────────

pub const CREDIT_REPORT_MAX_AGE_DAYS: i64 = 30;
pub const RISK_ASSESSMENT_MAX_AGE_HOURS: i64 = 24;

// ── Worker pool / polling defaults ────────────────────────────────────────────

pub const DEFAULT_WORKER_POOL_SIZE: usize = 10;
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SUBMIT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_UPDATE_RETRY_BASE_MS: u64 = 500;
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 5;
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;
pub const METADATA_PROPAGATION_DELAY_MS: u64 = 2_000;

/// Default minimum successful task-definition registrations out of 13 to
/// proceed without treating startup as degraded. spec.md §9 leaves the
/// exact threshold as an open question; `conductor.min_taskdef_registrations`
/// overrides this default (see `uw_config::ConductorConfig` and
/// `uw_workflow::RegistrationTracker::with_min_required`).
pub const DEFAULT_MIN_TASKDEF_REGISTRATIONS: usize = 3;

pub const TASK_DEFINITION_COUNT: usize = 13;
