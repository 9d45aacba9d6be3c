pub mod constants;
pub mod definitions;
pub mod domain;
pub mod error;
pub mod handler;
pub mod task;
pub mod types;

pub use constants::*;
pub use definitions::{
    default_task_definitions, underwriting_workflow_definition, TaskDefinition,
    WorkflowDefinition, WorkflowTask, TASK_TYPE_NAMES,
};
pub use domain::*;
pub use error::{WorkerError, WorkerResult};
pub use handler::{Handler, HandlerContext, HandlerMetrics, HandlerMetricsSnapshot};
pub use task::{ResultStatus, Task, TaskResult, TaskStatus};
pub use types::*;
