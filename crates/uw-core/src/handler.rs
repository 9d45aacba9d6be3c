//! uw-core::handler
//!
//! The handler capability set (spec.md §4.3): `execute(context, input_data)
//! → (output_data, error)`, made concrete as an `async_trait` object so the
//! registry can hold `Arc<dyn Handler>` uniformly across task types.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::WorkerResult;
use crate::task::Task;

/// Per-task ambient context: a deadline and a cooperative cancellation flag.
/// Handlers are not obligated to poll `is_cancelled` continuously — the
/// dispatcher enforces the deadline from outside via `tokio::select!` — but
/// long-running handlers may check it between steps.
#[derive(Clone)]
pub struct HandlerContext {
    deadline: Instant,
    cancelled: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl HandlerContext {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
            cancelled: std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A point-in-time snapshot of a handler's accumulated metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandlerMetricsSnapshot {
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub total_duration_ms: u64,
}

/// Per-task-type metric counters, updated under atomics rather than a mutex
/// (spec.md §5 shared-resource policy).
#[derive(Default)]
pub struct HandlerMetrics {
    tasks_completed: AtomicU64,
    tasks_failed: AtomicU64,
    total_duration_ms: AtomicU64,
}

impl HandlerMetrics {
    pub fn record_completed(&self, elapsed: Duration) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_failed(&self, elapsed: Duration) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> HandlerMetricsSnapshot {
        HandlerMetricsSnapshot {
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            total_duration_ms: self.total_duration_ms.load(Ordering::Relaxed),
        }
    }
}

/// A task-type handler. Implementations declare their own capability
/// dependencies (repository, credit bureau, etc.) as constructor
/// parameters — there is no ambient capability injection through this
/// trait (spec.md §9 design note).
#[async_trait]
pub trait Handler: Send + Sync {
    /// The task-type name this handler is bound to (one of §6.2's closed set).
    fn task_type(&self) -> &'static str;

    /// Run the handler against one task's input, returning the output
    /// mapping on success. Errors become a FAILED result at the dispatcher.
    async fn execute(&self, ctx: &HandlerContext, task: &Task) -> WorkerResult<Map<String, Value>>;

    /// Snapshot of this handler's accumulated metrics.
    fn metrics(&self) -> HandlerMetricsSnapshot;
}
