//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! classified path
//!     → forwarder.rs (base URL + path, one GET)
//!     → transport.rs (hyper-util or reqwest)
//!     → live Response<Body>, body unread
//! ```

pub mod forwarder;
pub mod transport;

pub use forwarder::{parse_upstream_url, Forwarder, DEFAULT_USER_AGENT};
pub use transport::{HyperTransport, ReqwestTransport, UpstreamTransport};
