//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Validate addresses and the upstream URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;
use crate::upstream::forwarder::parse_upstream_url;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `upstream.base_url`.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut push = |field: &'static str, message: String| {
        errors.push(ValidationError { field, message });
    };

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        push("listener.bind_address", format!("{:?}: {}", config.listener.bind_address, e));
    }

    if let Err(e) = parse_upstream_url(&config.upstream.base_url) {
        push("upstream.base_url", e.to_string());
    }
    if config.upstream.connect_timeout_secs == 0 {
        push("upstream.connect_timeout_secs", "must be greater than 0".to_string());
    }
    if config.upstream.timeout_secs == 0 {
        push("upstream.timeout_secs", "must be greater than 0".to_string());
    }

    if config.timeouts.request_secs == 0 {
        push("timeouts.request_secs", "must be greater than 0".to_string());
    }
    if config.limits.max_metadata_bytes == 0 {
        push("limits.max_metadata_bytes", "must be greater than 0".to_string());
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        push(
            "observability.log_format",
            format!("expected \"pretty\" or \"json\", got {:?}", config.observability.log_format),
        );
    }
    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            push(
                "observability.metrics_address",
                format!("{:?}: {}", config.observability.metrics_address, e),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
