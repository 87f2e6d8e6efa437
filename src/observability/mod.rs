//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher / server
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Request ID travels in the `x-request-id` header and in log fields
//! - Metrics are optional; recording without an exporter costs nothing

pub mod logging;
pub mod metrics;
