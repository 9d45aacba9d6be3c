//! The `assign_manual_review` auxiliary handler (spec.md §4.9). No
//! underwriter registry exists in this system, so assignment round-robins
//! over a fixed roster.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot, Task, WorkerResult, MANUAL_REVIEW_DUE_HOURS};
use uw_repository::Repository;

const UNDERWRITER_ROSTER: &[&str] = &["underwriter-1", "underwriter-2", "underwriter-3"];

pub struct ManualReviewHandler {
    #[allow(dead_code)]
    repository: Option<Arc<dyn Repository>>,
    next_assignee: AtomicU64,
    metrics: HandlerMetrics,
}

impl ManualReviewHandler {
    pub fn new(repository: Option<Arc<dyn Repository>>) -> Self {
        Self {
            repository,
            next_assignee: AtomicU64::new(0),
            metrics: HandlerMetrics::default(),
        }
    }

    fn next_roster_slot(&self) -> &'static str {
        let index = self.next_assignee.fetch_add(1, Ordering::Relaxed) as usize % UNDERWRITER_ROSTER.len();
        UNDERWRITER_ROSTER[index]
    }

    async fn run(&self, task: &Task) -> WorkerResult<Map<String, Value>> {
        let application_id = task.application_id()?;
        let risk_level = task.str_or("riskLevel", "");
        let priority = if risk_level == "high" { "high" } else { "normal" };
        let due_by = chrono::Utc::now() + chrono::Duration::hours(MANUAL_REVIEW_DUE_HOURS);

        let mut output = Map::new();
        output.insert("applicationId".into(), application_id.into());
        output.insert("assignedTo".into(), self.next_roster_slot().into());
        output.insert("priority".into(), priority.into());
        output.insert("dueBy".into(), due_by.to_rfc3339().into());
        Ok(output)
    }
}

#[async_trait]
impl Handler for ManualReviewHandler {
    fn task_type(&self) -> &'static str {
        "assign_manual_review"
    }

    async fn execute(&self, _ctx: &HandlerContext, task: &Task) -> WorkerResult<Map<String, Value>> {
        let started = std::time::Instant::now();
        let result = self.run(task).await;
        match &result {
            Ok(_) => self.metrics.record_completed(started.elapsed()),
            Err(_) => self.metrics.record_failed(started.elapsed()),
        }
        result
    }

    fn metrics(&self) -> HandlerMetricsSnapshot {
        self.metrics.snapshot()
    }
}
