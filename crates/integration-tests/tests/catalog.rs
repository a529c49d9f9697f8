//! Catalog browsing through the storefront.

use bazaar_integration_tests::TestApp;
use reqwest::StatusCode;

#[tokio::test]
async fn test_health_and_readiness() {
    let app = TestApp::spawn().await;

    assert_eq!(app.get("/health").await.text().await.unwrap(), "ok");
    assert_eq!(app.get("/health/ready").await.status(), StatusCode::OK);

    app.catalog.fail(true);
    assert_eq!(
        app.get("/health/ready").await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_catalog_page_lists_every_product() {
    let app = TestApp::spawn().await;
    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("content-security-policy"));
    let html = response.text().await.unwrap();
    for title in [
        "Fjallraven Backpack",
        "Dragon Station Bracelet",
        "Portable External Hard Drive",
        "Short Sleeve Boat Neck",
    ] {
        assert!(html.contains(title), "missing {title}");
    }
    assert!(html.contains("All Products"));
    assert!(html.contains("Men&#39;s Clothing") || html.contains("Men&#x27;s Clothing"));
}

#[tokio::test]
async fn test_category_and_search_filter_together() {
    let app = TestApp::spawn().await;

    let html = app
        .htmx_get("/products?category=jewelery")
        .await
        .text()
        .await
        .unwrap();
    assert!(!html.contains("<html"));
    assert!(html.contains("Dragon Station Bracelet"));
    assert!(!html.contains("Fjallraven Backpack"));

    let html = app
        .get("/?category=women%27s%20clothing&q=SLEEVE")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("Short Sleeve Boat Neck"));
    assert!(!html.contains("Dragon Station Bracelet"));
}

#[tokio::test]
async fn test_search_matches_description() {
    let app = TestApp::spawn().await;
    let html = app.get("/products?q=laptops").await.text().await.unwrap();
    assert!(html.contains("Fjallraven Backpack"));
    assert!(!html.contains("Portable External Hard Drive"));
}

#[tokio::test]
async fn test_search_without_match_shows_empty_state() {
    let app = TestApp::spawn().await;
    let html = app.get("/products?q=zeppelin").await.text().await.unwrap();
    assert!(html.contains("No products found"));
}

#[tokio::test]
async fn test_catalog_failure_shows_inline_error() {
    let app = TestApp::spawn().await;
    app.catalog.fail(true);

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Something went wrong"));
    assert!(html.contains("Try Again"));
}

#[tokio::test]
async fn test_page_links_versioned_stylesheet() {
    let app = TestApp::spawn().await;

    let html = app.get("/").await.text().await.unwrap();
    let start = html.find("/static/css/main.css?v=").unwrap();
    let href: String = html.get(start..).unwrap().chars().take_while(|c| *c != '"').collect();

    let response = app.get(&href).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains('{'));
}
