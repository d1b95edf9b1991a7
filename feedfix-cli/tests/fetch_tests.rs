#![allow(clippy::unwrap_used)]
//! Integration tests for feed retrieval against a local HTTP server.
//!
//! These tests cover:
//! - Successful download of a feed body
//! - Non-success status reported as `FetchError::Status`
//! - Body size limit enforcement
//! - End-to-end `/validate/url` and `/validate/url/report` routes

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use axum::Router;
use feedfix_cli::config::FetchConfig;
use feedfix_cli::fetch::{FeedFetcher, FetchError};
use feedfix_cli::server::{AppState, build_router};
use tower::ServiceExt;

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:g="http://base.google.com/ns/1.0">
<channel>
  <title>Shop</title>
  <item>
    <g:id>SKU-1</g:id>
    <g:title>Mug</g:title>
    <g:description>Blue mug</g:description>
    <g:link>https://shop.example/mug</g:link>
    <g:image_link>https://shop.example/mug.jpg</g:image_link>
    <g:price>19.99 PLN</g:price>
    <g:availability>in stock</g:availability>
  </item>
  <item>
    <g:title>Plate</g:title>
    <g:price>9.99</g:price>
  </item>
</channel>
</rss>"#;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Serve `FEED` at `/feed.xml` on an ephemeral port and return the base URL.
async fn spawn_feed_server() -> String {
    let app = Router::new().route("/feed.xml", get(|| async { FEED }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

fn fetcher(max_bytes: usize) -> FeedFetcher {
    FeedFetcher::new(&FetchConfig::default().with_max_bytes(max_bytes)).unwrap()
}

fn form_request(path: &str, url: &str) -> Request<Body> {
    let encoded: String = url
        .bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' | b'_' => {
                char::from(b).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect();
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("url={encoded}")))
        .unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_downloads_body() {
    let base = spawn_feed_server().await;
    let body = fetcher(1024 * 1024)
        .fetch(&format!("{base}/feed.xml"))
        .await
        .unwrap();
    assert_eq!(body, FEED.as_bytes());
}

#[tokio::test]
async fn test_fetch_reports_status() {
    let base = spawn_feed_server().await;
    let err = fetcher(1024 * 1024)
        .fetch(&format!("{base}/missing.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status(404)), "got: {err}");
}

#[tokio::test]
async fn test_fetch_enforces_size_limit() {
    let base = spawn_feed_server().await;
    let err = fetcher(64)
        .fetch(&format!("{base}/feed.xml"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::TooLarge { limit: 64 }), "got: {err}");
}

#[tokio::test]
async fn test_validate_url_route() {
    let base = spawn_feed_server().await;
    let app = build_router(AppState::new(fetcher(1024 * 1024), 1024 * 1024), 0);

    let response = app
        .oneshot(form_request("/validate/url", &format!("{base}/feed.xml")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["products_checked"], 2);
    // Item 2 misses id, link, availability (critical) and description, image_link (warning)
    assert_eq!(json["total_critical"], 3);
    assert_eq!(json["total_warnings"], 3);
    assert_eq!(json["error_stats"]["price_format"], 1);
    // 5 of 14 slots missing: round(64.28...) = 64
    assert_eq!(json["score"], 64);
}

#[tokio::test]
async fn test_validate_url_route_reports_download_failure() {
    let base = spawn_feed_server().await;
    let app = build_router(AppState::new(fetcher(1024 * 1024), 1024 * 1024), 0);

    let response = app
        .oneshot(form_request("/validate/url", &format!("{base}/missing.xml")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_route_renders_text() {
    let base = spawn_feed_server().await;
    let app = build_router(AppState::new(fetcher(1024 * 1024), 1024 * 1024), 0);

    let response = app
        .oneshot(form_request(
            "/validate/url/report",
            &format!("{base}/feed.xml"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("Quality score: 64 / 100"));
    assert!(text.contains("Product: Plate"));
    assert!(text.contains("ID:      no data"));
    assert!(text.contains("Generated: "));
}
