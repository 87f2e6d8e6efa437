//! The reqwest transport against a live mock upstream.

mod common;

use axum::body::to_bytes;
use axum::http::StatusCode;
use common::start_mock_upstream;
use std::sync::Arc;
use std::time::Duration;

use gomod_proxy::dispatch::{passthrough_handlers, Proxy, RequestContext, UpstreamConfig};
use gomod_proxy::upstream::{parse_upstream_url, Forwarder, ReqwestTransport, DEFAULT_USER_AGENT};

fn reqwest_transport() -> Arc<ReqwestTransport> {
    Arc::new(ReqwestTransport::new(Duration::from_secs(5), Duration::from_secs(30)).unwrap())
}

#[tokio::test]
async fn test_reqwest_streams_status_headers_and_body() {
    let archive: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
    let expected = archive.clone();
    let upstream = start_mock_upstream(move |_| (200, archive.clone())).await;

    let base = parse_upstream_url(&upstream.base_url()).unwrap();
    let forwarder = Forwarder::new(base, reqwest_transport()).with_user_agent("gomod-proxy-test");
    let response = forwarder
        .forward("/github.com/!azure/sdk/@v/v0.1.0.zip", Some("req-7"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-length"], "100000");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), expected.as_slice());

    let recorded = upstream.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/github.com/!azure/sdk/@v/v0.1.0.zip");
    assert_eq!(recorded[0].header("user-agent"), Some("gomod-proxy-test"));
    assert_eq!(recorded[0].header("x-request-id"), Some("req-7"));
}

#[tokio::test]
async fn test_reqwest_keeps_error_status() {
    let upstream = start_mock_upstream(|_| (410, b"gone".to_vec())).await;

    let base = parse_upstream_url(&upstream.base_url()).unwrap();
    let forwarder = Forwarder::new(base, reqwest_transport());
    let response = forwarder.forward("/m/@v/v1.0.0.mod", None).await.unwrap();

    assert_eq!(response.status(), StatusCode::GONE);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"gone");
    assert_eq!(upstream.recorded()[0].header("x-request-id"), None);
}

#[tokio::test]
async fn test_injected_reqwest_client() {
    let upstream = start_mock_upstream(|_| (200, b"v1.0.0\nv1.1.0\n".to_vec())).await;

    let transport = Arc::new(ReqwestTransport::from_client(reqwest::Client::new()));
    let proxy = Proxy::new(
        UpstreamConfig::new(upstream.base_url(), transport),
        passthrough_handlers().unwrap(),
    )
    .unwrap();

    let response = proxy
        .dispatch(RequestContext::get("/golang.org/x/text/@v/list").unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"v1.0.0\nv1.1.0\n");

    let recorded = upstream.recorded();
    assert_eq!(recorded[0].path, "/golang.org/x/text/@v/list");
    assert_eq!(recorded[0].header("user-agent"), Some(DEFAULT_USER_AGENT));
}

#[tokio::test]
async fn test_reqwest_upstream_failure_status_through_dispatch() {
    let upstream = start_mock_upstream(|_| (404, b"not found".to_vec())).await;

    let proxy = Proxy::new(
        UpstreamConfig::new(upstream.base_url(), reqwest_transport()),
        passthrough_handlers().unwrap(),
    )
    .unwrap();

    let response = proxy
        .dispatch(RequestContext::get("/golang.org/x/text/@latest").unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"unexpected status code: 404 Not Found");
}
