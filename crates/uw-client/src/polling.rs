//! The poller loop run by each of `worker_pool_size` workers (spec.md §4.1,
//! §7): round-robin over the known task types, poll, dispatch, submit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use uw_core::TASK_TYPE_NAMES;

use crate::client::{OrchestratorClient, TaskDispatch};
use crate::config::ClientConfig;

/// Runs until `shutdown` reports `true`. Each cycle walks every task type
/// once; a task type with nothing pending falls straight through to the
/// next, so a full empty cycle costs one `polling_interval_ms` sleep rather
/// than one per type.
pub async fn run_poller(
    worker_id: String,
    client: Arc<dyn OrchestratorClient>,
    dispatch: Arc<dyn TaskDispatch>,
    config: ClientConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(worker_id, "poller started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        for task_type in TASK_TYPE_NAMES {
            if *shutdown.borrow() {
                break;
            }

            match client.poll_task(task_type, &worker_id).await {
                Ok(Some(task)) => {
                    debug!(worker_id, task_type, task_id = %task.task_id.0, "dispatching task");
                    let result = dispatch.dispatch(task).await;
                    if let Err(e) = client.submit_task_result(&result).await {
                        error!(worker_id, task_type, error = %e, "failed to submit task result");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(worker_id, task_type, error = %e, "poll failed");
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(config.polling_interval_ms)) => {}
            _ = shutdown.changed() => {}
        }
    }

    info!(worker_id, "poller stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uw_core::{Task, TaskResult};

    struct CountingDispatch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TaskDispatch for CountingDispatch {
        async fn dispatch(&self, task: Task) -> TaskResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            TaskResult::completed(&task, "worker-1", Map::new(), Duration::from_millis(1))
        }
    }

    #[tokio::test]
    async fn stops_immediately_when_shutdown_already_signaled() {
        let client: Arc<dyn OrchestratorClient> = Arc::new(crate::simulated::SimulatedOrchestratorClient::new());
        let dispatch = Arc::new(CountingDispatch { calls: AtomicUsize::new(0) });
        let (tx, rx) = watch::channel(true);
        drop(tx);

        run_poller("worker-1".to_string(), client, dispatch.clone(), ClientConfig::default(), rx).await;
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dispatches_pending_task_then_stops_on_signal() {
        let sim = Arc::new(crate::simulated::SimulatedOrchestratorClient::new());
        let mut input = Map::new();
        input.insert("applicationId".into(), Value::String("APP-1".into()));
        sim.submit("credit_check", input).await;

        let client: Arc<dyn OrchestratorClient> = sim;
        let dispatch = Arc::new(CountingDispatch { calls: AtomicUsize::new(0) });
        let (tx, rx) = watch::channel(false);

        let mut config = ClientConfig::default();
        config.polling_interval_ms = 5;

        let handle = tokio::spawn(run_poller("worker-1".to_string(), client, dispatch.clone(), config, rx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 1);
    }
}
