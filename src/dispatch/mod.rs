//! Dispatcher and handler registry.
//!
//! # Data Flow
//! ```text
//! RequestContext
//!     → proxy.rs: classify → forward → validate status → decode
//!     → handlers.rs: kind handler (info / list / zip / mod)
//!     → on any failure: error handler
//!     → Response
//! ```
//!
//! # Design Decisions
//! - Handlers are registered before serving and read-only afterwards
//! - Exactly one terminal sink (the error handler) for every failure

pub mod handlers;
pub mod passthrough;
pub mod proxy;

pub use handlers::{
    ArchiveHandler, DefaultErrorHandler, ErrorHandler, HandlerResult, HandlerSet, InfoHandler,
    ListHandler, RequestContext,
};
pub use passthrough::passthrough_handlers;
pub use proxy::{Proxy, UpstreamConfig, DEFAULT_MAX_METADATA_BYTES};
