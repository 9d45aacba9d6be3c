//! HTTP implementation of [`OrchestratorClient`] against the REST protocol
//! in spec.md §6.1.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use uw_core::{Task, TaskDefinition, TaskResult, WorkerError, WorkerResult, WorkflowDefinition};

use crate::client::OrchestratorClient;
use crate::config::ClientConfig;
use crate::retry::RetryPolicy;

pub struct RealOrchestratorClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RealOrchestratorClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.server_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl OrchestratorClient for RealOrchestratorClient {
    async fn health_check(&self) -> WorkerResult<bool> {
        let resp = self
            .http
            .get(self.url("/health"))
            .timeout(Duration::from_millis(self.config.health_timeout_ms))
            .send()
            .await
            .map_err(|e| WorkerError::Transport(e.to_string()))?;
        Ok(resp.status().is_success())
    }

    async fn register_task_definition(&self, def: &TaskDefinition) -> WorkerResult<()> {
        let resp = self
            .http
            .post(self.url("/api/metadata/taskdefs"))
            .json(&vec![def])
            .send()
            .await
            .map_err(|e| WorkerError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        if matches!(status, 200 | 201 | 204 | 409) {
            Ok(())
        } else {
            Err(WorkerError::UnexpectedStatus(status))
        }
    }

    async fn register_workflow_definition(&self, def: &WorkflowDefinition) -> WorkerResult<()> {
        let resp = self
            .http
            .post(self.url("/api/metadata/workflow"))
            .json(def)
            .send()
            .await
            .map_err(|e| WorkerError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        if matches!(status, 200 | 201 | 409) {
            Ok(())
        } else {
            Err(WorkerError::UnexpectedStatus(status))
        }
    }

    async fn poll_task(&self, task_type: &str, worker_id: &str) -> WorkerResult<Option<Task>> {
        let resp = self
            .http
            .get(self.url(&format!("/api/tasks/poll/{task_type}")))
            .query(&[("workerid", worker_id)])
            .timeout(Duration::from_millis(self.config.poll_timeout_ms))
            .send()
            .await
            .map_err(|e| WorkerError::Transport(e.to_string()))?;

        if resp.status() != reqwest::StatusCode::OK {
            debug!(task_type, status = resp.status().as_u16(), "poll returned no task");
            return Ok(None);
        }

        let body = resp.bytes().await.map_err(|e| WorkerError::Transport(e.to_string()))?;
        if body.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice::<Task>(&body) {
            Ok(task) if !task.task_id.0.is_empty() && !task.task_type.is_empty() => Ok(Some(task)),
            _ => {
                debug!(task_type, "poll body missing task_id/task_type, treating as no task");
                Ok(None)
            }
        }
    }

    async fn submit_task_result(&self, result: &TaskResult) -> WorkerResult<()> {
        let policy = RetryPolicy::new(self.config.update_retry_base_ms, self.config.max_retry_attempts);
        policy
            .run(|| async {
                let resp = self
                    .http
                    .post(self.url("/api/tasks"))
                    .timeout(Duration::from_millis(self.config.submit_timeout_ms))
                    .json(result)
                    .send()
                    .await
                    .map_err(|e| WorkerError::Transport(e.to_string()))?;
                let status = resp.status().as_u16();
                if matches!(status, 200 | 204) {
                    Ok(())
                } else {
                    Err(WorkerError::UnexpectedStatus(status))
                }
            })
            .await
    }

    async fn start_workflow(&self, name: &str, input: Map<String, Value>) -> WorkerResult<String> {
        let resp = self
            .http
            .post(self.url(&format!("/api/workflow/{name}")))
            .json(&input)
            .send()
            .await
            .map_err(|e| WorkerError::Transport(e.to_string()))?;
        if resp.status() != reqwest::StatusCode::OK {
            return Err(WorkerError::UnexpectedStatus(resp.status().as_u16()));
        }
        let body = resp.text().await.map_err(|e| WorkerError::Transport(e.to_string()))?;
        Ok(body.trim().trim_matches('"').to_string())
    }

    async fn get_workflow_status(&self, workflow_id: &str) -> WorkerResult<Value> {
        let resp = self
            .http
            .get(self.url(&format!("/api/workflow/{workflow_id}")))
            .send()
            .await
            .map_err(|e| WorkerError::Transport(e.to_string()))?;
        if resp.status() != reqwest::StatusCode::OK {
            return Err(WorkerError::UnexpectedStatus(resp.status().as_u16()));
        }
        resp.json().await.map_err(|e| WorkerError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path_without_double_slash() {
        let mut config = ClientConfig::default();
        config.server_url = "http://localhost:8080/".to_string();
        let client = RealOrchestratorClient::new(config);
        assert_eq!(client.url("/health"), "http://localhost:8080/health");
    }

    #[test]
    fn url_preserves_bare_base_without_trailing_slash() {
        let client = RealOrchestratorClient::new(ClientConfig {
            server_url: "http://orchestrator.internal:9000".to_string(),
            ..ClientConfig::default()
        });
        assert_eq!(
            client.url("/api/tasks/poll/credit_check"),
            "http://orchestrator.internal:9000/api/tasks/poll/credit_check"
        );
    }
}
