//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `upstream.base_url`.
pub const UPSTREAM_GOPROXY_ENV: &str = "UPSTREAM_GOPROXY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from TOML text. Missing fields take their defaults.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read configuration from a TOML file, or defaults when `path` is `None`.
///
/// The result is not validated yet; see [`finalize`].
pub fn read_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            parse_config(&content)
        }
        None => Ok(ProxyConfig::default()),
    }
}

/// Apply environment overrides, looking variables up through `lookup`.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(UPSTREAM_GOPROXY_ENV).filter(|v| !v.is_empty()) {
        tracing::debug!(env = UPSTREAM_GOPROXY_ENV, "Upstream overridden from environment");
        config.upstream.base_url = url;
    }
}

/// Validate a fully assembled configuration.
pub fn finalize(config: ProxyConfig) -> Result<ProxyConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
