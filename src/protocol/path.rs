//! Request path classification.
//!
//! # Responsibilities
//! - Map an inbound path to one of the five module proxy operations
//! - Split off the module prefix so the path can be rebuilt exactly
//!
//! # Design Decisions
//! - Pure function: no I/O, same input always yields the same result
//! - Suffix matching only, evaluated in a fixed order
//! - Version syntax is checked through an injectable capability
//! - Module prefixes with `.` or `..` segments are rejected

use std::fmt;

use crate::error::ClassifyError;
use crate::protocol::semver::is_valid_semver;
use crate::protocol::types::OperationKind;

const LATEST_SUFFIX: &str = "/@latest";
const LIST_SUFFIX: &str = "/@v/list";
const VERSION_DIR: &str = "/@v/";

/// A module proxy operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPath {
    /// `<module>/@latest`
    LatestInfo,
    /// `<module>/@v/list`
    VersionList,
    /// `<module>/@v/<version>.info`
    VersionInfo(String),
    /// `<module>/@v/<version>.zip`
    VersionZip(String),
    /// `<module>/@v/<version>.mod`
    VersionMod(String),
}

impl RequestPath {
    /// Handler kind serving this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            RequestPath::LatestInfo | RequestPath::VersionInfo(_) => OperationKind::Info,
            RequestPath::VersionList => OperationKind::List,
            RequestPath::VersionZip(_) => OperationKind::Zip,
            RequestPath::VersionMod(_) => OperationKind::Mod,
        }
    }

    /// Version named in the path, if any.
    pub fn version(&self) -> Option<&str> {
        match self {
            RequestPath::VersionInfo(v) | RequestPath::VersionZip(v) | RequestPath::VersionMod(v) => {
                Some(v)
            }
            RequestPath::LatestInfo | RequestPath::VersionList => None,
        }
    }
}

/// A classified path: the module prefix plus the operation on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPath {
    /// Everything before the matched suffix, e.g. `/github.com/pkg/errors`.
    pub module: String,
    pub request: RequestPath,
}

impl ClassifiedPath {
    /// Rebuild the path this value was classified from.
    pub fn to_path(&self) -> String {
        match &self.request {
            RequestPath::LatestInfo => format!("{}{LATEST_SUFFIX}", self.module),
            RequestPath::VersionList => format!("{}{LIST_SUFFIX}", self.module),
            RequestPath::VersionInfo(v) => format!("{}{VERSION_DIR}{v}.info", self.module),
            RequestPath::VersionZip(v) => format!("{}{VERSION_DIR}{v}.zip", self.module),
            RequestPath::VersionMod(v) => format!("{}{VERSION_DIR}{v}.mod", self.module),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.request.kind()
    }
}

impl fmt::Display for ClassifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Classify `path` using the built-in semver check.
pub fn classify(path: &str) -> Result<ClassifiedPath, ClassifyError> {
    classify_with(path, is_valid_semver)
}

/// Classify `path`, validating versions with `is_valid_version`.
pub fn classify_with<F>(path: &str, is_valid_version: F) -> Result<ClassifiedPath, ClassifyError>
where
    F: Fn(&str) -> bool,
{
    if let Some(module) = path.strip_suffix(LATEST_SUFFIX) {
        return Ok(ClassifiedPath {
            module: checked_module(module, path)?,
            request: RequestPath::LatestInfo,
        });
    }
    if let Some(module) = path.strip_suffix(LIST_SUFFIX) {
        return Ok(ClassifiedPath {
            module: checked_module(module, path)?,
            request: RequestPath::VersionList,
        });
    }

    let basename = base_name(path);
    let (candidate, ext) = match basename.rfind('.') {
        Some(idx) => (&basename[..idx], &basename[idx + 1..]),
        None => (basename, ""),
    };

    if !is_valid_version(candidate) {
        return Err(ClassifyError::InvalidVersionFormat(candidate.to_string()));
    }

    let suffix = format!("{VERSION_DIR}{basename}");
    let Some(module) = path.strip_suffix(suffix.as_str()) else {
        return Err(ClassifyError::InvalidModulePath(path.to_string()));
    };

    let version = candidate.to_string();
    let request = match ext {
        "info" => RequestPath::VersionInfo(version),
        "zip" => RequestPath::VersionZip(version),
        "mod" => RequestPath::VersionMod(version),
        _ => return Err(ClassifyError::UnsupportedPath(path.to_string())),
    };

    Ok(ClassifiedPath {
        module: checked_module(module, path)?,
        request,
    })
}

/// Reject module prefixes with `.` or `..` segments, plain or percent-encoded.
///
/// URL normalization would otherwise send a different module path upstream
/// than the one handlers see.
fn checked_module(module: &str, path: &str) -> Result<String, ClassifyError> {
    let has_dot_segment = module.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    });
    if has_dot_segment {
        return Err(ClassifyError::InvalidModulePath(path.to_string()));
    }
    Ok(module.to_string())
}

/// Last path segment, ignoring trailing slashes.
fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
