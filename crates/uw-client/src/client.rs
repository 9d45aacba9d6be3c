use async_trait::async_trait;
use serde_json::{Map, Value};

use uw_core::{Task, TaskDefinition, TaskResult, WorkerResult, WorkflowDefinition};

/// The worker's sole network boundary with the orchestrator (spec.md §4.1,
/// §4.2). `RealOrchestratorClient` and `SimulatedOrchestratorClient` both
/// implement this identically from a handler's point of view.
#[async_trait]
pub trait OrchestratorClient: Send + Sync {
    async fn health_check(&self) -> WorkerResult<bool>;
    async fn register_task_definition(&self, def: &TaskDefinition) -> WorkerResult<()>;
    async fn register_workflow_definition(&self, def: &WorkflowDefinition) -> WorkerResult<()>;
    async fn poll_task(&self, task_type: &str, worker_id: &str) -> WorkerResult<Option<Task>>;
    async fn submit_task_result(&self, result: &TaskResult) -> WorkerResult<()>;
    async fn start_workflow(&self, name: &str, input: Map<String, Value>) -> WorkerResult<String>;
    async fn get_workflow_status(&self, workflow_id: &str) -> WorkerResult<Value>;
}

/// What a poller hands a [`Task`] to once it has one. Implemented by the
/// handler registry/dispatcher so that this crate never has to depend on it.
#[async_trait]
pub trait TaskDispatch: Send + Sync {
    async fn dispatch(&self, task: Task) -> TaskResult;
}
