//! Startup orchestration.
//!
//! # Responsibilities
//! - Pick the upstream transport for the configured scheme
//! - Assemble the dispatcher from validated config and a handler set
//!
//! # Design Decisions
//! - Fail fast: an unusable upstream URL is fatal here, never per request
//! - HTTPS upstreams go through reqwest; plain HTTP through the hyper-util client

use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::{ProxyConfig, UpstreamSettings};
use crate::dispatch::{HandlerSet, Proxy, UpstreamConfig};
use crate::error::ProxyError;
use crate::upstream::forwarder::parse_upstream_url;
use crate::upstream::transport::{HyperTransport, ReqwestTransport, UpstreamTransport};

/// Build the transport matching the scheme of `settings.base_url`.
pub fn build_transport(settings: &UpstreamSettings) -> Result<Arc<dyn UpstreamTransport>, ProxyError> {
    let url = parse_upstream_url(&settings.base_url)?;
    let connect_timeout = Duration::from_secs(settings.connect_timeout_secs);

    let transport: Arc<dyn UpstreamTransport> = if url.scheme() == "https" {
        let timeout = Duration::from_secs(settings.timeout_secs);
        Arc::new(ReqwestTransport::new(connect_timeout, timeout)?)
    } else {
        Arc::new(HyperTransport::new(connect_timeout))
    };

    tracing::debug!(scheme = url.scheme(), "Upstream transport selected");
    Ok(transport)
}

/// Build the dispatcher for `config`, serving through `handlers`.
pub fn build_proxy(config: &ProxyConfig, handlers: HandlerSet) -> Result<Proxy, ProxyError> {
    let transport = build_transport(&config.upstream)?;

    let mut upstream = UpstreamConfig::new(config.upstream.base_url.clone(), transport);
    upstream.user_agent = config.upstream.user_agent.clone();
    upstream.max_metadata_bytes = config.limits.max_metadata_bytes;

    Proxy::new(upstream, handlers)
}
