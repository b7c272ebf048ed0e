//! Integration tests for the session basket.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use scoop_integration_tests::{TestContext, product_source};

/// Context with two products available for lookup.
async fn stocked() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.mount_product("p1", product_source("Product A", 10.99, Some("Vanilla")))
        .await;
    ctx.mount_product("p2", product_source("Product B", 9.99, None))
        .await;
    ctx.mount_search(&[
        ("p1", product_source("Product A", 10.99, Some("Vanilla"))),
        ("p2", product_source("Product B", 9.99, None)),
    ])
    .await;
    ctx
}

#[tokio::test]
async fn test_new_session_has_empty_basket() {
    let mut ctx = TestContext::new().await;

    let response = ctx.get("/basket").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<h1>Basket</h1>"));
    assert!(response.body.contains("Your basket is empty."));
    assert!(response.body.contains("£0.00"));
}

#[tokio::test]
async fn test_add_redirects_back_with_notice() {
    let mut ctx = stocked().await;

    let response = ctx
        .post_form("/basket/add?search_term=vanilla", "product_id=p1")
        .await;
    assert!(response.redirects_to("/?search_term=vanilla"));

    let page = ctx.get("/?search_term=vanilla").await;
    assert!(page.body.contains("Item was successfully added to the basket."));

    // Flashed once
    let page = ctx.get("/").await;
    assert!(!page.body.contains("Item was successfully added to the basket."));
}

#[tokio::test]
async fn test_basket_shows_items_and_total() {
    let mut ctx = stocked().await;

    ctx.post_form("/basket/add", "product_id=p1").await;
    ctx.post_form("/basket/add", "product_id=p2").await;

    let response = ctx.get("/basket").await;

    assert!(response.body.contains("Product A"));
    assert!(response.body.contains("Product B"));
    assert!(response.body.contains("£20.98"));
}

#[tokio::test]
async fn test_adding_twice_keeps_two_items() {
    let mut ctx = stocked().await;

    ctx.post_form("/basket/add", "product_id=p1").await;
    ctx.post_form("/basket/add", "product_id=p1").await;

    let response = ctx.get("/basket").await;

    assert_eq!(response.body.matches("Product A").count(), 2);
    assert!(response.body.contains("£21.98"));
}

#[tokio::test]
async fn test_add_missing_product_leaves_basket_unchanged() {
    let mut ctx = stocked().await;
    ctx.mount_missing_product("nope").await;

    ctx.post_form("/basket/add", "product_id=p1").await;
    let response = ctx.post_form("/basket/add", "product_id=nope").await;
    assert!(response.redirects_to("/"));

    let page = ctx.get("/").await;
    assert!(page.body.contains("Product not found."));

    let basket = ctx.get("/basket").await;
    assert!(basket.body.contains("£10.99"));
    assert_eq!(basket.body.matches("Product A").count(), 1);
}

#[tokio::test]
async fn test_add_without_id_is_ignored() {
    let mut ctx = stocked().await;

    let response = ctx.post_form("/basket/add", "").await;
    assert!(response.redirects_to("/"));

    let basket = ctx.get("/basket").await;
    assert!(basket.body.contains("Your basket is empty."));
}

#[tokio::test]
async fn test_remove_takes_out_one_item() {
    let mut ctx = stocked().await;

    ctx.post_form("/basket/add", "product_id=p1").await;
    ctx.post_form("/basket/add", "product_id=p2").await;
    ctx.post_form("/basket/add", "product_id=p1").await;

    let response = ctx.post_form("/basket/remove", "product_id=p1").await;
    assert!(response.redirects_to("/basket"));

    let basket = ctx.get("/basket").await;
    assert_eq!(basket.body.matches("Product A").count(), 1);
    assert!(basket.body.contains("Product B"));
    assert!(basket.body.contains("£20.98"));
}

#[tokio::test]
async fn test_remove_unknown_id_is_noop() {
    let mut ctx = stocked().await;

    ctx.post_form("/basket/add", "product_id=p2").await;
    let response = ctx.post_form("/basket/remove", "product_id=p9").await;
    assert!(response.redirects_to("/basket"));

    let basket = ctx.get("/basket").await;
    assert!(basket.body.contains("Product B"));
    assert!(basket.body.contains("£9.99"));
}

#[tokio::test]
async fn test_baskets_are_per_session() {
    let mut alice = stocked().await;
    let mut bob = alice.fork_session();

    alice.post_form("/basket/add", "product_id=p1").await;
    bob.post_form("/basket/add", "product_id=p2").await;

    let alice_basket = alice.get("/basket").await;
    assert!(alice_basket.body.contains("Product A"));
    assert!(!alice_basket.body.contains("Product B"));

    let bob_basket = bob.get("/basket").await;
    assert!(bob_basket.body.contains("Product B"));
    assert!(!bob_basket.body.contains("Product A"));

    let mut carol = alice.fork_session();
    let carol_basket = carol.get("/basket").await;
    assert!(carol_basket.body.contains("Your basket is empty."));
}

#[tokio::test]
async fn test_index_outage_leaves_basket_unchanged() {
    let mut ctx = TestContext::new().await;
    ctx.mount_product("p1", product_source("Product A", 1.0, None))
        .await;
    Mock::given(method("GET"))
        .and(path("/products/_doc/p2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&ctx.catalog)
        .await;

    ctx.post_form("/basket/add", "product_id=p1").await;
    let response = ctx.post_form("/basket/add", "product_id=p2").await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);

    let basket = ctx.get("/basket").await;
    assert_eq!(basket.body.matches("Product A").count(), 1);
    assert!(basket.body.contains("£1.00"));
}

#[tokio::test]
async fn test_repeated_product_id_uses_first() {
    let mut ctx = stocked().await;

    let response = ctx
        .post_form("/basket/add", "product_id=p2&product_id=p1")
        .await;
    assert!(response.redirects_to("/"));

    let basket = ctx.get("/basket").await;
    assert!(basket.body.contains("Product B"));
    assert!(!basket.body.contains("Product A"));

    let response = ctx
        .post_form("/basket/remove", "product_id=p2&product_id=p2")
        .await;
    assert!(response.redirects_to("/basket"));

    let basket = ctx.get("/basket").await;
    assert!(basket.body.contains("Your basket is empty."));
}

#[tokio::test]
async fn test_non_form_body_is_ignored() {
    let mut ctx = stocked().await;

    let response = ctx.post_form("/basket/add", "{\"product_id\": \"p1\"}").await;
    assert!(response.redirects_to("/"));

    let response = ctx.post_form("/basket/remove", "%%%").await;
    assert!(response.redirects_to("/basket"));

    let basket = ctx.get("/basket").await;
    assert!(basket.body.contains("Your basket is empty."));
}
