use uw_core::{
    DEFAULT_HEALTH_TIMEOUT_MS, DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_POLLING_INTERVAL_MS,
    DEFAULT_POLL_TIMEOUT_MS, DEFAULT_SUBMIT_TIMEOUT_MS, DEFAULT_UPDATE_RETRY_BASE_MS,
    DEFAULT_WORKER_POOL_SIZE,
};

/// Transport-level configuration for the orchestrator client (spec.md §6.4
/// `conductor.*`).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub worker_pool_size: usize,
    pub polling_interval_ms: u64,
    pub poll_timeout_ms: u64,
    pub submit_timeout_ms: u64,
    pub health_timeout_ms: u64,
    pub update_retry_base_ms: u64,
    pub max_retry_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            polling_interval_ms: DEFAULT_POLLING_INTERVAL_MS,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            submit_timeout_ms: DEFAULT_SUBMIT_TIMEOUT_MS,
            health_timeout_ms: DEFAULT_HEALTH_TIMEOUT_MS,
            update_retry_base_ms: DEFAULT_UPDATE_RETRY_BASE_MS,
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
        }
    }
}
