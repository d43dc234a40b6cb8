//! Configuration loading from disk and the environment.
//!
//! Loading only parses. Validation runs once, after every override layer has
//! been applied, so an override can repair a bad value from the file.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::CourierConfig;
use crate::config::validation::ValidationError;

/// Environment variable overriding `node.endpoint_url`.
pub const RPC_URL_ENV_VAR: &str = "COURIER_RPC_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ValidationError::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML config file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<CourierConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply `COURIER_RPC_URL` from the process environment.
pub fn apply_env_overrides(config: &mut CourierConfig) {
    apply_overrides_from(config, |key| std::env::var(key).ok());
}

/// Apply overrides read through `lookup`; blank values are ignored.
pub fn apply_overrides_from<F>(config: &mut CourierConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RPC_URL_ENV_VAR).filter(|url| !url.trim().is_empty()) {
        config.node.endpoint_url = url;
    }
}
