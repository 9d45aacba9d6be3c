//! Tracks task-definition registration during startup so the worker can
//! decide when enough of the closed task-type set has been accepted by the
//! orchestrator to begin polling (spec.md §9 Open Question, resolved in
//! `DESIGN.md`: three successful registrations is sufficient readiness).

use std::collections::HashSet;

use uw_core::DEFAULT_MIN_TASKDEF_REGISTRATIONS;

/// Accumulates which task-type names have been successfully registered.
#[derive(Debug)]
pub struct RegistrationTracker {
    registered: HashSet<String>,
    min_required: usize,
}

impl Default for RegistrationTracker {
    fn default() -> Self {
        Self {
            registered: HashSet::new(),
            min_required: DEFAULT_MIN_TASKDEF_REGISTRATIONS,
        }
    }
}

impl RegistrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the readiness threshold (spec.md §9 open question: re-implementations
    /// should make this configurable — `conductor.min_taskdef_registrations`).
    pub fn with_min_required(mut self, min_required: usize) -> Self {
        self.min_required = min_required;
        self
    }

    /// Record a successful (or idempotent-409) registration.
    pub fn record(&mut self, task_type: &str) {
        self.registered.insert(task_type.to_string());
    }

    pub fn count(&self) -> usize {
        self.registered.len()
    }

    /// True once at least `min_required` task types have registered. The
    /// worker need not wait for all 13 — a slow or flaky orchestrator
    /// registering a handful of auxiliary types late shouldn't block the
    /// pollers from starting on the core five.
    pub fn is_ready(&self) -> bool {
        self.count() >= self.min_required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_until_threshold_reached() {
        let mut tracker = RegistrationTracker::new();
        assert!(!tracker.is_ready());
        tracker.record("credit_check");
        tracker.record("income_verification");
        assert!(!tracker.is_ready());
        tracker.record("risk_assessment");
        assert!(tracker.is_ready());
    }

    #[test]
    fn duplicate_records_do_not_double_count() {
        let mut tracker = RegistrationTracker::new();
        tracker.record("credit_check");
        tracker.record("credit_check");
        assert_eq!(tracker.count(), 1);
    }
}
