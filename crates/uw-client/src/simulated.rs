//! In-process orchestrator stand-in, used when the real orchestrator is
//! unreachable at startup (spec.md §4.2). Observably equivalent to
//! [`crate::real::RealOrchestratorClient`] from a handler's point of view.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::info;

use uw_core::{Task, TaskDefinition, TaskId, TaskResult, TaskStatus, WorkerResult, WorkflowDefinition, WorkflowInstanceId};

use crate::client::OrchestratorClient;

#[derive(Default)]
struct Store {
    pending: HashMap<String, VecDeque<Task>>,
    results: HashMap<String, TaskResult>,
}

pub struct SimulatedOrchestratorClient {
    store: Mutex<Store>,
    next_id: AtomicU64,
}

impl Default for SimulatedOrchestratorClient {
    fn default() -> Self {
        Self {
            store: Mutex::new(Store::default()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl SimulatedOrchestratorClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_task_id(&self) -> String {
        format!("sim-task-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Enqueue a single task directly, bypassing `start_workflow` (spec.md
    /// §4.2 "internal submit used by local test harnesses").
    pub async fn submit(&self, task_type: &str, input: Map<String, Value>) -> Task {
        let task = Task {
            task_id: TaskId(self.next_task_id()),
            task_type: task_type.to_string(),
            workflow_instance_id: WorkflowInstanceId(format!("sim-wf-{}", self.next_id.load(Ordering::SeqCst))),
            input_data: input,
            status: TaskStatus::InProgress,
        };
        self.store
            .lock()
            .await
            .pending
            .entry(task_type.to_string())
            .or_default()
            .push_back(task.clone());
        task
    }

    /// Read back a result previously written by `submit_task_result`, keyed
    /// by task id. Used by test harnesses that drive `submit` directly.
    pub async fn result_for(&self, task_id: &str) -> Option<TaskResult> {
        self.store.lock().await.results.get(task_id).cloned()
    }
}

const CANONICAL_TASK_TYPES: [&str; 5] = [
    "credit_check",
    "income_verification",
    "risk_assessment",
    "underwriting_decision",
    "update_application_state",
];

#[async_trait]
impl OrchestratorClient for SimulatedOrchestratorClient {
    async fn health_check(&self) -> WorkerResult<bool> {
        Ok(true)
    }

    async fn register_task_definition(&self, _def: &TaskDefinition) -> WorkerResult<()> {
        Ok(())
    }

    async fn register_workflow_definition(&self, _def: &WorkflowDefinition) -> WorkerResult<()> {
        Ok(())
    }

    async fn poll_task(&self, task_type: &str, _worker_id: &str) -> WorkerResult<Option<Task>> {
        let mut store = self.store.lock().await;
        Ok(store.pending.get_mut(task_type).and_then(VecDeque::pop_front))
    }

    async fn submit_task_result(&self, result: &TaskResult) -> WorkerResult<()> {
        self.store
            .lock()
            .await
            .results
            .insert(result.task_id.0.clone(), result.clone());
        Ok(())
    }

    /// Synthesizes the five canonical tasks of `underwriting_workflow`
    /// (spec.md §4.2) and enqueues them; the real orchestrator's inter-task
    /// output wiring (`${<ref>.output.Y}`) has no counterpart here, so
    /// `update_application_state`'s `newState` is seeded with a placeholder.
    async fn start_workflow(&self, name: &str, input: Map<String, Value>) -> WorkerResult<String> {
        let workflow_id = format!("sim-wf-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        info!(name, workflow_id, "starting simulated workflow");

        for task_type in CANONICAL_TASK_TYPES {
            let mut task_input = input.clone();
            if task_type == "update_application_state" {
                task_input.insert("newState".to_string(), Value::String("pending".to_string()));
            }
            let task = Task {
                task_id: TaskId(self.next_task_id()),
                task_type: task_type.to_string(),
                workflow_instance_id: WorkflowInstanceId(workflow_id.clone()),
                input_data: task_input,
                status: TaskStatus::InProgress,
            };
            self.store
                .lock()
                .await
                .pending
                .entry(task_type.to_string())
                .or_default()
                .push_back(task);
        }

        Ok(workflow_id)
    }

    async fn get_workflow_status(&self, workflow_id: &str) -> WorkerResult<Value> {
        let store = self.store.lock().await;
        let statuses: Vec<Value> = store
            .results
            .values()
            .filter(|r| r.workflow_instance_id.0 == workflow_id)
            .map(|r| serde_json::json!({"taskType": r.reference_task_name, "status": r.status}))
            .collect();
        Ok(serde_json::json!({ "workflowId": workflow_id, "tasks": statuses }))
    }
}
