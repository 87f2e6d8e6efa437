//! Module proxy protocol values.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata for one module version, as served by `@latest` and `@v/<version>.info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleVersionInfo {
    /// Version string, e.g. `v0.0.1`.
    #[serde(rename = "Version", alias = "version", default)]
    pub version: String,

    /// Commit time of the version. The Unix epoch when upstream omits it.
    #[serde(rename = "Time", alias = "time", default = "unix_epoch")]
    pub time: DateTime<FixedOffset>,
}

fn unix_epoch() -> DateTime<FixedOffset> {
    DateTime::<Utc>::default().into()
}

/// The four handler kinds a classified request resolves to.
///
/// `@latest` and `@v/<version>.info` share the info kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Info,
    List,
    Zip,
    Mod,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Info => "info",
            OperationKind::List => "list",
            OperationKind::Zip => "zip",
            OperationKind::Mod => "mod",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handler slots in a [`HandlerSet`](crate::dispatch::HandlerSet), including the error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Operation(OperationKind),
    Error,
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerKind::Operation(kind) => write!(f, "{kind}"),
            HandlerKind::Error => f.write_str("error"),
        }
    }
}

impl From<OperationKind> for HandlerKind {
    fn from(kind: OperationKind) -> Self {
        HandlerKind::Operation(kind)
    }
}
