//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults for missing fields)
//!     → UPSTREAM_GOPROXY environment override
//!     → command line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, UPSTREAM_GOPROXY_ENV};
pub use schema::{
    LimitsConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, TimeoutConfig,
    UpstreamSettings,
};
pub use validation::ValidationError;
