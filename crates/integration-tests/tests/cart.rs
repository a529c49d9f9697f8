//! Cart ledger through the storefront session.

use bazaar_integration_tests::{TestApp, badge_count, hx_trigger};
use reqwest::StatusCode;
use reqwest::header::{LOCATION, REFERER};

#[tokio::test]
async fn test_add_updates_badge_and_fires_event() {
    let app = TestApp::spawn().await;

    let response = app.htmx_post("/cart/add", &[("product_id", "5")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&response).as_deref(), Some("cart-updated"));
    assert_eq!(badge_count(&response.text().await.unwrap()), 1);

    app.htmx_post("/cart/add", &[("product_id", "5")]).await;
    app.htmx_post("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(app.cart_count().await, 3);

    let html = app.get("/cart").await.text().await.unwrap();
    assert!(html.contains("Dragon Station Bracelet"));
    assert!(html.contains("Fjallraven Backpack"));
    // 2 x 22.75 + 109.95
    assert!(html.contains("$155.45"));
}

#[tokio::test]
async fn test_add_unknown_product_is_ignored() {
    let app = TestApp::spawn().await;

    let response = app.htmx_post("/cart/add", &[("product_id", "999")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(hx_trigger(&response).is_none());
    assert_eq!(app.cart_count().await, 0);
}

#[tokio::test]
async fn test_plain_post_redirects_back() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/cart/add"))
        .header(REFERER, app.url("/?category=jewelery"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("product_id=5")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/?category=jewelery");
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_quantity_controls() {
    let app = TestApp::spawn().await;
    app.htmx_post("/cart/add", &[("product_id", "18")]).await;

    let response = app.htmx_post("/cart/increase", &[("index", "0")]).await;
    assert_eq!(hx_trigger(&response).as_deref(), Some("cart-updated"));
    assert!(response.text().await.unwrap().contains("$19.70"));

    app.htmx_post("/cart/decrease", &[("index", "0")]).await;
    app.htmx_post("/cart/decrease", &[("index", "0")]).await;
    assert_eq!(app.cart_count().await, 1);

    app.htmx_post("/cart/quantity", &[("index", "0"), ("quantity", "4")])
        .await;
    assert_eq!(app.cart_count().await, 4);

    app.htmx_post("/cart/quantity", &[("index", "0"), ("quantity", "lots")])
        .await;
    assert_eq!(app.cart_count().await, 1);

    // Out-of-range rows change nothing
    app.htmx_post("/cart/increase", &[("index", "7")]).await;
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_remove_row_and_empty_state() {
    let app = TestApp::spawn().await;
    app.htmx_post("/cart/add", &[("product_id", "1")]).await;
    app.htmx_post("/cart/add", &[("product_id", "9")]).await;

    let html = app
        .htmx_post("/cart/remove", &[("index", "0")])
        .await
        .text()
        .await
        .unwrap();
    assert!(!html.contains("Fjallraven Backpack"));
    assert!(html.contains("Portable External Hard Drive"));

    let response = app.post("/cart/remove", &[("index", "0")]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/cart");

    let html = app.get("/cart").await.text().await.unwrap();
    assert!(html.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_cart_falls_back_to_snapshots() {
    let app = TestApp::spawn().await;
    app.htmx_post("/cart/add", &[("product_id", "9")]).await;
    app.catalog.fail(true);

    let html = app.get("/cart").await.text().await.unwrap();
    assert!(html.contains("Portable External Hard Drive"));
    assert!(html.contains("$64.00"));
    assert!(html.contains("Live prices are unavailable"));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let first = TestApp::spawn().await;
    first.htmx_post("/cart/add", &[("product_id", "1")]).await;

    let other_client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();
    let html = other_client
        .get(first.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(badge_count(&html), 0);
}
