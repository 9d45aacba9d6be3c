use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("loading configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("deserializing configuration: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("unrecognized environment {0:?}, expected one of development, uat, production")]
    UnrecognizedEnvironment(String),
}
