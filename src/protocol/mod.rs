//! Go module proxy protocol.
//!
//! # Data Flow
//! ```text
//! inbound path
//!     → path.rs (classify into RequestPath + module prefix)
//!     → [upstream forwarder fetches the same path]
//!     → decode.rs (info JSON / version list; zip & mod untouched)
//!     → typed value handed to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Classification and decoding are pure and transport-free
//! - Version syntax follows Go module semver rules (semver.rs)

pub mod decode;
pub mod path;
pub mod semver;
pub mod types;

pub use path::{classify, classify_with, ClassifiedPath, RequestPath};
pub use semver::is_valid_semver;
pub use types::{HandlerKind, ModuleVersionInfo, OperationKind};
