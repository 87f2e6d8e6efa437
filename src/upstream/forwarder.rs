//! Upstream request forwarding.
//!
//! # Responsibilities
//! - Validate the upstream base URL once, at construction
//! - Build `<base scheme+authority><inbound path>` for each request
//! - Issue exactly one GET through the injected transport
//!
//! # Design Decisions
//! - The response body is returned unread; the caller owns it
//! - No retries and no deadline; both are transport concerns
//! - The inbound request ID is propagated upstream

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, Response, Uri};
use std::sync::Arc;
use url::{Position, Url};

use crate::error::{ProxyError, TransportError};
use crate::http::request::X_REQUEST_ID;
use crate::upstream::transport::UpstreamTransport;

/// Default `user-agent` sent upstream.
pub const DEFAULT_USER_AGENT: &str = concat!("gomod-proxy/", env!("CARGO_PKG_VERSION"));

/// Parse and check an upstream base URL.
///
/// The URL must be absolute, carry a scheme and a host.
pub fn parse_upstream_url(raw: &str) -> Result<Url, ProxyError> {
    let invalid = |reason: String| ProxyError::InvalidUpstreamUrl {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("not a hierarchical url".to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Sends module proxy requests to the upstream.
#[derive(Clone)]
pub struct Forwarder {
    base_url: Url,
    transport: Arc<dyn UpstreamTransport>,
    user_agent: HeaderValue,
}

impl Forwarder {
    pub fn new(base_url: Url, transport: Arc<dyn UpstreamTransport>) -> Self {
        Self {
            base_url,
            transport,
            user_agent: HeaderValue::from_static(DEFAULT_USER_AGENT),
        }
    }

    /// Override the `user-agent` header. Invalid header values are ignored.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        match HeaderValue::from_str(user_agent) {
            Ok(value) => self.user_agent = value,
            Err(_) => tracing::warn!(user_agent, "Ignoring invalid upstream user agent"),
        }
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Upstream URI for `path`: the base scheme and authority followed by
    /// `path` byte for byte. The base path, query and fragment are dropped,
    /// and dot segments or percent escapes in `path` are left untouched.
    pub fn upstream_uri(&self, path: &str) -> Result<Uri, TransportError> {
        let scheme = self.base_url.scheme();
        if !matches!(scheme, "http" | "https") {
            return Err(TransportError::InvalidRequest(format!(
                "unsupported scheme {scheme:?}"
            )));
        }
        if !path.starts_with('/') {
            return Err(TransportError::InvalidRequest(format!(
                "path {path:?} is not absolute"
            )));
        }

        let target = format!("{}{}", &self.base_url[..Position::BeforePath], path);
        target
            .parse()
            .map_err(|e| TransportError::InvalidRequest(format!("{target}: {e}")))
    }

    /// Issue a GET for `path` and return the live response.
    pub async fn forward(
        &self,
        path: &str,
        request_id: Option<&str>,
    ) -> Result<Response<Body>, TransportError> {
        let uri = self.upstream_uri(path)?;
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::USER_AGENT, self.user_agent.clone());
        if let Some(id) = request_id.and_then(|id| HeaderValue::from_str(id).ok()) {
            builder = builder.header(X_REQUEST_ID, id);
        }
        let request = builder
            .body(Body::empty())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        tracing::debug!(uri = %request.uri(), "Forwarding upstream");
        self.transport.send(request).await
    }
}
