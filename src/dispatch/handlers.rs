//! Application handlers and their registry.
//!
//! # Responsibilities
//! - Define one handler capability per operation kind plus the error handler
//! - Hold the registered handlers in an immutable [`HandlerSet`]
//! - Reject missing handlers at registration time
//!
//! # Design Decisions
//! - Handlers are trait objects; async closures implement the traits directly
//! - The error handler is installed eagerly with [`DefaultErrorHandler`]
//! - Unset operation handlers are an explicit error, never a null call

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{request::Parts, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use std::future::Future;
use std::sync::Arc;

use crate::error::{HandlerError, ProxyError};
use crate::http::request::X_REQUEST_ID;
use crate::protocol::types::{HandlerKind, ModuleVersionInfo, OperationKind};

/// Result returned by operation handlers.
pub type HandlerResult = Result<Response, HandlerError>;

/// Owned view of the inbound request head, handed to every handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Value of `x-request-id`, if present.
    pub request_id: Option<String>,
    /// Module prefix, set once the path has been classified.
    pub module: Option<String>,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts) -> Self {
        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            request_id,
            module: None,
        }
    }

    /// Context for a bare GET of `path`. Mostly useful in tests.
    pub fn get(path: &str) -> Result<Self, axum::http::Error> {
        let (parts, _) = axum::http::Request::get(path).body(())?.into_parts();
        Ok(Self::from_parts(&parts))
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }
}

/// Handles `@latest` and `@v/<version>.info`.
#[async_trait]
pub trait InfoHandler: Send + Sync {
    async fn handle(&self, ctx: RequestContext, info: ModuleVersionInfo) -> HandlerResult;
}

/// Handles `@v/list`.
#[async_trait]
pub trait ListHandler: Send + Sync {
    async fn handle(&self, ctx: RequestContext, versions: Vec<String>) -> HandlerResult;
}

/// Handles `@v/<version>.zip` and `@v/<version>.mod`.
///
/// `body` is the upstream response stream, uninspected. Dropping it releases
/// the upstream connection.
#[async_trait]
pub trait ArchiveHandler: Send + Sync {
    async fn handle(&self, ctx: RequestContext, version: String, body: Body) -> HandlerResult;
}

/// Terminal sink for every pipeline failure. Must not fail.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(&self, ctx: RequestContext, err: ProxyError) -> Response;
}

#[async_trait]
impl<F, Fut> InfoHandler for F
where
    F: Fn(RequestContext, ModuleVersionInfo) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: RequestContext, info: ModuleVersionInfo) -> HandlerResult {
        (self)(ctx, info).await
    }
}

#[async_trait]
impl<F, Fut> ListHandler for F
where
    F: Fn(RequestContext, Vec<String>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: RequestContext, versions: Vec<String>) -> HandlerResult {
        (self)(ctx, versions).await
    }
}

#[async_trait]
impl<F, Fut> ArchiveHandler for F
where
    F: Fn(RequestContext, String, Body) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    async fn handle(&self, ctx: RequestContext, version: String, body: Body) -> HandlerResult {
        (self)(ctx, version, body).await
    }
}

#[async_trait]
impl<F, Fut> ErrorHandler for F
where
    F: Fn(RequestContext, ProxyError) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    async fn handle(&self, ctx: RequestContext, err: ProxyError) -> Response {
        (self)(ctx, err).await
    }
}

/// Answers every failure with 500 and the error message as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

#[async_trait]
impl ErrorHandler for DefaultErrorHandler {
    async fn handle(&self, _ctx: RequestContext, err: ProxyError) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
    }
}

/// The registered handlers of a proxy.
///
/// Assembled before serving and moved into the [`Proxy`](crate::dispatch::Proxy),
/// which never mutates it.
#[derive(Clone)]
pub struct HandlerSet {
    info: Option<Arc<dyn InfoHandler>>,
    list: Option<Arc<dyn ListHandler>>,
    zip: Option<Arc<dyn ArchiveHandler>>,
    module: Option<Arc<dyn ArchiveHandler>>,
    error: Arc<dyn ErrorHandler>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self {
            info: None,
            list: None,
            zip: None,
            module: None,
            error: Arc::new(DefaultErrorHandler),
        }
    }

    /// Register the info handler. `None` is rejected.
    pub fn set_info(&mut self, handler: Option<Arc<dyn InfoHandler>>) -> Result<&mut Self, ProxyError> {
        self.info = Some(handler.ok_or(nil(OperationKind::Info))?);
        Ok(self)
    }

    /// Register the list handler. `None` is rejected.
    pub fn set_list(&mut self, handler: Option<Arc<dyn ListHandler>>) -> Result<&mut Self, ProxyError> {
        self.list = Some(handler.ok_or(nil(OperationKind::List))?);
        Ok(self)
    }

    /// Register the zip handler. `None` is rejected.
    pub fn set_zip(&mut self, handler: Option<Arc<dyn ArchiveHandler>>) -> Result<&mut Self, ProxyError> {
        self.zip = Some(handler.ok_or(nil(OperationKind::Zip))?);
        Ok(self)
    }

    /// Register the mod handler. `None` is rejected.
    pub fn set_mod(&mut self, handler: Option<Arc<dyn ArchiveHandler>>) -> Result<&mut Self, ProxyError> {
        self.module = Some(handler.ok_or(nil(OperationKind::Mod))?);
        Ok(self)
    }

    /// Replace the error handler. `None` is rejected.
    pub fn set_error(&mut self, handler: Option<Arc<dyn ErrorHandler>>) -> Result<&mut Self, ProxyError> {
        self.error = handler.ok_or(ProxyError::NilHandler { kind: HandlerKind::Error })?;
        Ok(self)
    }

    pub fn info(&self) -> Result<&Arc<dyn InfoHandler>, ProxyError> {
        self.info.as_ref().ok_or(not_configured(OperationKind::Info))
    }

    pub fn list(&self) -> Result<&Arc<dyn ListHandler>, ProxyError> {
        self.list.as_ref().ok_or(not_configured(OperationKind::List))
    }

    pub fn zip(&self) -> Result<&Arc<dyn ArchiveHandler>, ProxyError> {
        self.zip.as_ref().ok_or(not_configured(OperationKind::Zip))
    }

    pub fn module(&self) -> Result<&Arc<dyn ArchiveHandler>, ProxyError> {
        self.module.as_ref().ok_or(not_configured(OperationKind::Mod))
    }

    pub fn error(&self) -> &Arc<dyn ErrorHandler> {
        &self.error
    }

    pub fn is_configured(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::Info => self.info.is_some(),
            OperationKind::List => self.list.is_some(),
            OperationKind::Zip => self.zip.is_some(),
            OperationKind::Mod => self.module.is_some(),
        }
    }
}

impl Default for HandlerSet {
    fn default() -> Self {
        Self::new()
    }
}

fn nil(kind: OperationKind) -> ProxyError {
    ProxyError::NilHandler { kind: kind.into() }
}

fn not_configured(kind: OperationKind) -> ProxyError {
    ProxyError::HandlerNotConfigured { kind: kind.into() }
}
