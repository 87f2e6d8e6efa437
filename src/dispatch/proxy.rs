//! Request dispatch.
//!
//! # Responsibilities
//! - Classify the inbound path
//! - Forward the request upstream and validate the status
//! - Decode the body for the classified kind and call its handler
//! - Route every failure to the error handler
//!
//! # Design Decisions
//! - `Proxy` holds no mutable state; share it behind an `Arc`
//! - The upstream body is owned by exactly one stage at a time and dropped
//!   (released) wherever the pipeline stops
//! - Cancellation is best-effort: dropping the dispatch future drops the
//!   in-flight upstream request, and the transport decides what that means

use axum::http::StatusCode;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::handlers::{HandlerSet, RequestContext};
use crate::error::ProxyError;
use crate::observability::metrics;
use crate::protocol::decode::{decode_info, decode_version_list, read_body};
use crate::protocol::path::{classify, ClassifiedPath, RequestPath};
use crate::protocol::types::OperationKind;
use crate::upstream::forwarder::{parse_upstream_url, Forwarder};
use crate::upstream::transport::UpstreamTransport;

/// Default cap on buffered `.info` / `@v/list` bodies.
pub const DEFAULT_MAX_METADATA_BYTES: usize = 1024 * 1024;

/// Upstream settings a [`Proxy`] is built from.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Absolute base URL of the upstream module proxy.
    pub base_url: String,
    /// Transport used for every upstream request. Must be safe for concurrent use.
    pub transport: Arc<dyn UpstreamTransport>,
    /// `user-agent` sent upstream; the crate default when `None`.
    pub user_agent: Option<String>,
    /// Largest metadata body read into memory.
    pub max_metadata_bytes: usize,
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn UpstreamTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            user_agent: None,
            max_metadata_bytes: DEFAULT_MAX_METADATA_BYTES,
        }
    }
}

/// Go module proxy dispatcher.
pub struct Proxy {
    forwarder: Forwarder,
    handlers: HandlerSet,
    max_metadata_bytes: usize,
}

impl Proxy {
    /// Build a proxy. Fails with [`ProxyError::InvalidUpstreamUrl`] if the
    /// base URL is not absolute.
    pub fn new(upstream: UpstreamConfig, handlers: HandlerSet) -> Result<Self, ProxyError> {
        let base_url = parse_upstream_url(&upstream.base_url)?;
        let mut forwarder = Forwarder::new(base_url, upstream.transport);
        if let Some(user_agent) = upstream.user_agent.as_deref() {
            forwarder = forwarder.with_user_agent(user_agent);
        }

        tracing::info!(
            upstream = %forwarder.base_url(),
            info_handler = handlers.is_configured(OperationKind::Info),
            list_handler = handlers.is_configured(OperationKind::List),
            zip_handler = handlers.is_configured(OperationKind::Zip),
            mod_handler = handlers.is_configured(OperationKind::Mod),
            "Proxy configured"
        );

        Ok(Self {
            forwarder,
            handlers,
            max_metadata_bytes: upstream.max_metadata_bytes,
        })
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }

    /// Serve one request. Always produces a response.
    pub async fn dispatch(&self, mut ctx: RequestContext) -> Response {
        let start = Instant::now();

        let classified = match classify(ctx.path()) {
            Ok(classified) => classified,
            Err(e) => return self.fail(ctx, "unclassified", e.into(), start).await,
        };
        let kind = classified.kind().as_str();
        ctx.module = Some(classified.module.clone());

        match self.serve(&ctx, classified).await {
            Ok(response) => {
                tracing::debug!(
                    request_id = ctx.request_id.as_deref().unwrap_or("unknown"),
                    kind,
                    module = ctx.module.as_deref().unwrap_or_default(),
                    status = %response.status(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Request served"
                );
                metrics::record_dispatch(kind, "ok", start);
                response
            }
            Err(err) => self.fail(ctx, kind, err, start).await,
        }
    }

    async fn serve(
        &self,
        ctx: &RequestContext,
        classified: ClassifiedPath,
    ) -> Result<Response, ProxyError> {
        let path = classified.to_path();
        let response = self
            .forwarder
            .forward(&path, ctx.request_id.as_deref())
            .await?;

        let status = response.status();
        metrics::record_upstream_status(status.as_u16());
        if status != StatusCode::OK {
            return Err(ProxyError::UpstreamStatus { status });
        }
        let body = response.into_body();

        match classified.request {
            RequestPath::LatestInfo | RequestPath::VersionInfo(_) => {
                let bytes = read_body(body, self.max_metadata_bytes).await?;
                let info = decode_info(&bytes)?;
                let handler = self.handlers.info()?;
                Ok(handler.handle(ctx.clone(), info).await?)
            }
            RequestPath::VersionList => {
                let bytes = read_body(body, self.max_metadata_bytes).await?;
                let versions = decode_version_list(&bytes)?;
                let handler = self.handlers.list()?;
                Ok(handler.handle(ctx.clone(), versions).await?)
            }
            RequestPath::VersionZip(version) => {
                let handler = self.handlers.zip()?;
                Ok(handler.handle(ctx.clone(), version, body).await?)
            }
            RequestPath::VersionMod(version) => {
                let handler = self.handlers.module()?;
                Ok(handler.handle(ctx.clone(), version, body).await?)
            }
        }
    }

    async fn fail(
        &self,
        ctx: RequestContext,
        kind: &'static str,
        err: ProxyError,
        start: Instant,
    ) -> Response {
        let request_id = ctx.request_id.as_deref().unwrap_or("unknown");
        if matches!(err, ProxyError::Classify(_)) {
            tracing::debug!(request_id, path = %ctx.path(), error = %err, "Unrecognized path");
        } else {
            tracing::warn!(
                request_id,
                kind,
                path = %ctx.path(),
                error = %err,
                "Request failed"
            );
        }
        metrics::record_dispatch(kind, err.label(), start);

        self.handlers.error().handle(ctx, err).await
    }
}
