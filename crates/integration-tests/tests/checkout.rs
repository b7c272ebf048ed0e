//! Integration tests for the mock checkout.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use scoop_integration_tests::{TestContext, product_source};

#[tokio::test]
async fn test_empty_basket_cannot_check_out() {
    let mut ctx = TestContext::new().await;

    let response = ctx.post_form("/checkout", "").await;
    assert!(response.redirects_to("/basket"));

    let basket = ctx.get("/basket").await;
    assert!(
        basket
            .body
            .contains("You cannot check out, the basket is empty.")
    );
}

#[tokio::test]
async fn test_checkout_confirms_payment_and_empties_basket() {
    let mut ctx = TestContext::new().await;
    ctx.mount_product("p1", product_source("Product A", 10.0, None))
        .await;
    ctx.mount_product("p2", product_source("Product B", 15.0, None))
        .await;

    ctx.post_form("/basket/add", "product_id=p1").await;
    ctx.post_form("/basket/add", "product_id=p2").await;

    let response = ctx.post_form("/checkout", "").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Thank you for your order!"));
    assert!(response.body.contains(
        "Your payment of £25.00 has been received. Your purchase will be delivered in 2-3 working days."
    ));

    let basket = ctx.get("/basket").await;
    assert!(basket.body.contains("Your basket is empty."));
    assert!(basket.body.contains("£0.00"));
}

#[tokio::test]
async fn test_second_checkout_is_rejected() {
    let mut ctx = TestContext::new().await;
    ctx.mount_product("p1", product_source("Product A", 10.99, None))
        .await;

    ctx.post_form("/basket/add", "product_id=p1").await;
    let first = ctx.post_form("/checkout", "").await;
    assert!(first.body.contains("Your payment of £10.99 has been received."));

    let second = ctx.post_form("/checkout", "").await;
    assert!(second.redirects_to("/basket"));
}
