//! Error types for the module proxy pipeline.
//!
//! Every failure raised while serving a request is a [`ProxyError`] and ends up
//! at the registered [`ErrorHandler`](crate::dispatch::ErrorHandler).

use axum::http::StatusCode;
use std::error::Error as StdError;
use thiserror::Error;

use crate::protocol::types::HandlerKind;

/// Boxed error used for opaque sources.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Top-level proxy error.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The configured upstream base URL is unusable. Raised at construction.
    #[error("unexpected upstream url {url:?}: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    /// The inbound path is not a module proxy request.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// The upstream request could not be built or sent.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Upstream answered with something other than 200 OK.
    #[error("unexpected status code: {status}")]
    UpstreamStatus { status: StatusCode },

    /// The upstream body could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An application handler returned a failure.
    #[error(transparent)]
    Handler(#[from] HandlerError),

    /// A handler registration was attempted without a handler.
    #[error("unexpected nil handler for {kind}")]
    NilHandler { kind: HandlerKind },

    /// A request was classified for a kind that has no handler registered.
    #[error("no {kind} handler configured")]
    HandlerNotConfigured { kind: HandlerKind },
}

impl ProxyError {
    /// Suggested response status for custom error handlers.
    ///
    /// The default error handler always answers 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Classify(_) => StatusCode::NOT_FOUND,
            ProxyError::Transport(_) | ProxyError::UpstreamStatus { .. } | ProxyError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ProxyError::InvalidUpstreamUrl { .. } => "invalid_upstream_url",
            ProxyError::Classify(ClassifyError::InvalidVersionFormat(_)) => "invalid_version_format",
            ProxyError::Classify(ClassifyError::InvalidModulePath(_)) => "invalid_module_path",
            ProxyError::Classify(ClassifyError::UnsupportedPath(_)) => "unsupported_path",
            ProxyError::Transport(_) => "transport",
            ProxyError::UpstreamStatus { .. } => "upstream_status",
            ProxyError::Decode(_) => "decode",
            ProxyError::Handler(_) => "handler",
            ProxyError::NilHandler { .. } => "nil_handler",
            ProxyError::HandlerNotConfigured { .. } => "handler_not_configured",
        }
    }
}

/// Path classification failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("unexpected semantic version format: {0}")]
    InvalidVersionFormat(String),

    #[error("unexpected module path: {0}")]
    InvalidModulePath(String),

    #[error("unexpected url path: {0}")]
    UnsupportedPath(String),
}

/// Outbound request failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be constructed (bad scheme, bad URI).
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    /// The transport failed to send the request or receive the response head.
    #[error("upstream request failed: {0}")]
    Send(#[source] BoxError),
}

/// Upstream body decoding failures.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read upstream body: {0}")]
    Body(String),

    #[error("malformed version info: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected semantic version format in upstream response: {0}")]
    InvalidVersion(String),

    #[error("version list is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Failure returned by an application handler.
///
/// Wraps the handler's own error value untouched; use [`HandlerError::downcast_ref`]
/// or [`HandlerError::into_inner`] to get it back.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HandlerError(BoxError);

impl HandlerError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self(err.into())
    }

    /// Handler error carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(message.into())
    }

    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.0.downcast_ref::<E>()
    }

    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::OperationKind;

    #[derive(Debug, Error)]
    #[error("disk full")]
    struct DiskFull;

    #[test]
    fn test_messages() {
        let err = ProxyError::UpstreamStatus { status: StatusCode::BAD_REQUEST };
        assert_eq!(err.to_string(), "unexpected status code: 400 Bad Request");

        let err: ProxyError = ClassifyError::InvalidModulePath("/a/b".into()).into();
        assert_eq!(err.to_string(), "unexpected module path: /a/b");

        let err = ProxyError::HandlerNotConfigured { kind: OperationKind::Zip.into() };
        assert_eq!(err.to_string(), "no zip handler configured");
    }

    #[test]
    fn test_handler_error_keeps_value() {
        let err: ProxyError = HandlerError::new(DiskFull).into();
        assert_eq!(err.to_string(), "disk full");
        match err {
            ProxyError::Handler(inner) => assert!(inner.downcast_ref::<DiskFull>().is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        let err: ProxyError = ClassifyError::UnsupportedPath("/x".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let err = ProxyError::UpstreamStatus { status: StatusCode::GONE };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        let err: ProxyError = HandlerError::msg("boom").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
