//! Layered configuration loading (spec.md §6.4): a base file, an
//! `ENVIRONMENT`-named overlay, then `APP__`-prefixed process environment
//! variables, merged by the `config` crate exactly as `chronx-node` wires
//! its own startup configuration, then a `${VAR}` substitution pass.

use std::collections::HashMap;
use std::path::Path;

use config::{Config, Environment as EnvSource, File};

use crate::error::ConfigError;
use crate::model::{AppConfig, Environment};
use crate::substitute::substitute_placeholders;

/// Load configuration from `config_dir`, layering `<config_dir>/default.*`,
/// `<config_dir>/<environment>.*`, then process environment variables.
///
/// `environment` is read from the `ENVIRONMENT` process variable by the
/// caller before this runs (spec.md §6.4); it defaults to
/// [`Environment::Development`] when unset.
pub fn load(config_dir: &Path, environment: Environment) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(environment.as_str())).required(false))
        .add_source(EnvSource::with_prefix("APP").separator("__"));

    let merged = builder.build()?;
    let raw: serde_json::Value = merged.try_deserialize()?;

    let env_vars: HashMap<String, String> = std::env::vars().collect();
    let substituted = substitute_placeholders(raw, &env_vars);

    Ok(serde_json::from_value(substituted)?)
}

/// Read the `ENVIRONMENT` process variable, defaulting to development on
/// absence or an unrecognized value (spec.md §6.4 default).
pub fn detect_environment() -> Environment {
    std::env::var("ENVIRONMENT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}
