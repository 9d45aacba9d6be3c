pub mod error;
pub mod loader;
pub mod model;
pub mod substitute;

pub use error::ConfigError;
pub use loader::load;
pub use model::{
    AppConfig, ApplicationConfig, ConductorConfig, ConnectionConfig, Environment, LoggingConfig,
    ServiceConfig,
};
