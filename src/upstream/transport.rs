//! Outbound HTTP transports.
//!
//! # Responsibilities
//! - Define the transport capability the forwarder sends through
//! - Plain HTTP via the hyper-util pooled client
//! - HTTPS (and HTTP) via reqwest
//!
//! # Design Decisions
//! - Implementations must be safe to share across concurrent requests
//! - Response bodies are returned as streams, never buffered here
//! - Timeouts belong to the transport, not to the forwarder

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::TryStreamExt;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;

use crate::error::TransportError;

/// Capability for sending one upstream request.
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Send `request` and return the response with its body unread.
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError>;
}

/// Transport backed by the hyper-util legacy client. Plain HTTP only.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
}

impl HyperTransport {
    pub fn new(connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

#[async_trait]
impl UpstreamTransport for HyperTransport {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError> {
        let response: Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(|e| TransportError::Send(Box::new(e)))?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Transport backed by reqwest, used for HTTPS upstreams.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(format!("failed to build client: {e}")))?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UpstreamTransport for ReqwestTransport {
    async fn send(&self, request: Request<Body>) -> Result<Response<Body>, TransportError> {
        let (parts, _body) = request.into_parts();
        let url = reqwest::Url::parse(&parts.uri.to_string())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .request(parts.method, url)
            .headers(parts.headers)
            .send()
            .await
            .map_err(|e| TransportError::Send(Box::new(e)))?;

        let mut builder = Response::builder()
            .status(response.status())
            .version(response.version());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(response.headers().clone());
        }
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        builder
            .body(Body::from_stream(stream))
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))
    }
}
