//! Configuration shape (spec.md §6.4).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Uat,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Uat => "uat",
            Environment::Production => "production",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Development
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Environment::Development),
            "uat" => Ok(Environment::Uat),
            "production" => Ok(Environment::Production),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub port: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub timeout: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConductorConfig {
    pub server_url: String,
    pub worker_pool_size: usize,
    pub polling_interval_ms: u64,
    pub update_retry_time_ms: u64,
    pub max_retry_attempts: u32,
    #[serde(default = "default_min_taskdef_registrations")]
    pub min_taskdef_registrations: usize,
    pub connection: ConnectionConfig,
}

fn default_min_taskdef_registrations() -> usize {
    uw_core::DEFAULT_MIN_TASKDEF_REGISTRATIONS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub provider: String,
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_seconds: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub application: ApplicationConfig,
    pub conductor: ConductorConfig,
    pub services: HashMap<String, ServiceConfig>,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn service(&self, provider: &str) -> Option<&ServiceConfig> {
        self.services.get(provider)
    }
}
