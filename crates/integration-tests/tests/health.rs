//! Integration tests for health endpoints and response headers.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use scoop_integration_tests::TestContext;

#[tokio::test]
async fn test_liveness_does_not_touch_index() {
    let mut ctx = TestContext::with_catalog_url("http://127.0.0.1:9").await;

    let response = ctx.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_readiness_follows_index() {
    let mut ctx = TestContext::new().await;
    ctx.mount_ping(200).await;

    let response = ctx.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_fails_when_index_unhealthy() {
    let mut ctx = TestContext::new().await;
    ctx.mount_ping(503).await;

    let response = ctx.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_readiness_fails_when_index_unreachable() {
    let mut ctx = TestContext::with_catalog_url("http://127.0.0.1:9").await;

    let response = ctx.get("/health/ready").await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let mut ctx = TestContext::new().await;

    let response = ctx.get("/health").await;

    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["cache-control"], "no-store");
    assert!(
        response.headers["content-security-policy"]
            .to_str()
            .unwrap()
            .contains("frame-ancestors 'none'")
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let mut ctx = TestContext::new().await;

    let response = ctx.get("/health").await;
    let generated = response.headers["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let mut ctx = TestContext::new().await;

    let headers = ctx
        .get_with_header("/health", "x-request-id", "edge-7781")
        .await
        .headers;

    assert_eq!(headers["x-request-id"], "edge-7781");
}
