//! The handler registry: a read-only, post-startup `HashMap<String, Arc<dyn
//! Handler>>` implementing `TaskDispatch` (spec.md §4.3) so a poller never
//! needs to know which handler answers which task type.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{error, warn};

use uw_client::TaskDispatch;
use uw_core::{Handler, HandlerContext, Task, TaskDefinition, TaskResult};

const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
    response_timeouts: HashMap<String, Duration>,
    worker_id: String,
}

impl HandlerRegistry {
    pub fn new(worker_id: impl Into<String>) -> Self {
        Self {
            handlers: HashMap::new(),
            response_timeouts: HashMap::new(),
            worker_id: worker_id.into(),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.insert(handler.task_type().to_string(), handler);
    }

    /// Pulls `response_timeout_seconds` per task type from the orchestrator
    /// metadata set, so the dispatcher enforces the same deadline the
    /// orchestrator was told to expect.
    pub fn with_task_definitions(mut self, defs: &[TaskDefinition]) -> Self {
        for def in defs {
            self.response_timeouts
                .insert(def.name.clone(), Duration::from_secs(def.response_timeout_seconds));
        }
        self
    }

    fn timeout_for(&self, task_type: &str) -> Duration {
        self.response_timeouts
            .get(task_type)
            .copied()
            .unwrap_or(Duration::from_secs(DEFAULT_RESPONSE_TIMEOUT_SECS))
    }
}

#[async_trait]
impl TaskDispatch for HandlerRegistry {
    async fn dispatch(&self, task: Task) -> TaskResult {
        let Some(handler) = self.handlers.get(&task.task_type).cloned() else {
            warn!(task_type = %task.task_type, "no handler registered");
            return TaskResult::failed(
                &task,
                &self.worker_id,
                format!("No handler registered for task type: {}", task.task_type),
                Duration::ZERO,
            );
        };

        let timeout = self.timeout_for(&task.task_type);
        let ctx = HandlerContext::with_timeout(timeout);
        let started = Instant::now();

        let handler_for_spawn = handler.clone();
        let task_for_spawn = task.clone();
        let ctx_for_spawn = ctx.clone();
        let join = tokio::task::spawn(async move {
            handler_for_spawn.execute(&ctx_for_spawn, &task_for_spawn).await
        });

        tokio::select! {
            outcome = join => {
                let elapsed = started.elapsed();
                match outcome {
                    Ok(Ok(output)) => TaskResult::completed(&task, &self.worker_id, output, elapsed),
                    Ok(Err(e)) => TaskResult::failed(&task, &self.worker_id, e.to_string(), elapsed),
                    Err(join_err) if join_err.is_panic() => {
                        error!(task_type = %task.task_type, task_id = %task.task_id.0, "handler panicked");
                        TaskResult::failed(&task, &self.worker_id, format!("handler panicked: {join_err}"), elapsed)
                    }
                    Err(join_err) => {
                        TaskResult::failed(&task, &self.worker_id, join_err.to_string(), elapsed)
                    }
                }
            }
            _ = tokio::time::sleep(timeout) => {
                warn!(task_type = %task.task_type, task_id = %task.task_id.0, "handler exceeded response timeout");
                TaskResult::timed_out(&task, &self.worker_id, started.elapsed())
            }
        }
    }
}
