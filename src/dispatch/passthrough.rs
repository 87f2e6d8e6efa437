//! Pass-through handlers.
//!
//! Re-serve what the upstream returned in the module proxy wire format.
//! Used by the `gomod-proxy` binary; applications usually register their own.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;

use crate::dispatch::handlers::{
    ArchiveHandler, HandlerResult, HandlerSet, InfoHandler, ListHandler, RequestContext,
};
use crate::error::ProxyError;
use crate::protocol::types::ModuleVersionInfo;

/// Answers with the info document as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoPassthrough;

#[async_trait]
impl InfoHandler for InfoPassthrough {
    async fn handle(&self, _ctx: RequestContext, info: ModuleVersionInfo) -> HandlerResult {
        Ok(Json(info).into_response())
    }
}

/// Answers with one version per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPassthrough;

#[async_trait]
impl ListHandler for ListPassthrough {
    async fn handle(&self, _ctx: RequestContext, versions: Vec<String>) -> HandlerResult {
        let body: String = versions.iter().map(|v| format!("{v}\n")).collect();
        Ok(body.into_response())
    }
}

/// Streams the upstream body back with a fixed content type.
#[derive(Debug, Clone, Copy)]
pub struct ArchivePassthrough {
    content_type: &'static str,
}

impl ArchivePassthrough {
    pub const ZIP: Self = Self { content_type: "application/zip" };
    pub const MOD: Self = Self { content_type: "text/plain; charset=utf-8" };
}

#[async_trait]
impl ArchiveHandler for ArchivePassthrough {
    async fn handle(&self, _ctx: RequestContext, _version: String, body: Body) -> HandlerResult {
        let mut response = Response::new(body);
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        Ok(response)
    }
}

/// Handler set with a pass-through handler for every kind.
pub fn passthrough_handlers() -> Result<HandlerSet, ProxyError> {
    let mut handlers = HandlerSet::new();
    handlers
        .set_info(Some(Arc::new(InfoPassthrough)))?
        .set_list(Some(Arc::new(ListPassthrough)))?
        .set_zip(Some(Arc::new(ArchivePassthrough::ZIP)))?
        .set_mod(Some(Arc::new(ArchivePassthrough::MOD)))?;
    Ok(handlers)
}
