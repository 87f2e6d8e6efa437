//! Go module proxy front end.
//!
//! Accepts module proxy requests, forwards each one to an upstream module
//! proxy, and hands the decoded result to application handlers.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (axum server, request id, timeout)
//!                          │
//!                          ▼
//!                     dispatch::Proxy ──▶ protocol::classify
//!                          │
//!                          ▼
//!                     upstream::Forwarder ──▶ Upstream module proxy
//!                          │
//!                          ▼
//!                     protocol::decode (status check, JSON, version list)
//!                          │
//!                ┌─────────┴─────────┐
//!                ▼                   ▼
//!     info / list / zip / mod     error handler
//!          handler
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod protocol;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use dispatch::{HandlerSet, Proxy, RequestContext, UpstreamConfig};
pub use error::{HandlerError, ProxyError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
