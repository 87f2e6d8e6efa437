//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all route
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Hand every request to the module proxy dispatcher
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::dispatch::{Proxy, RequestContext};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<Proxy>,
}

/// HTTP server for the module proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `proxy`.
    pub fn new(config: &ProxyConfig, proxy: Arc<Proxy>) -> Self {
        let router = Self::build_router(config, AppState { proxy });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Router with all layers applied, for embedding or testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: Shutdown,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler: every path goes to the dispatcher.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, _body) = request.into_parts();
    let ctx = RequestContext::from_parts(&parts);

    tracing::debug!(
        request_id = ctx.request_id.as_deref().unwrap_or("unknown"),
        method = %ctx.method,
        path = %ctx.path(),
        "Dispatching request"
    );

    state.proxy.dispatch(ctx).await
}
