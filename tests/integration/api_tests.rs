//! API integration tests for the tile endpoint and error handling.
//!
//! Tests verify:
//! - Placeholder responses on cache miss, cached bytes on hit
//! - Response headers (content type, cache hints, hit marker)
//! - Coordinate validation (400 before anything touches the filesystem)
//! - Upstream failures stay invisible to clients

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tile_relay::TileCoord;

use super::test_utils::{is_valid_png, MockFetcher, TestApp};

// =============================================================================
// Miss Path
// =============================================================================

#[tokio::test]
async fn test_miss_serves_placeholder_then_fills_cache() {
    let coord = TileCoord::new(5, 10, 12);
    let app = TestApp::new(MockFetcher::new().with_tile(coord, b"real tile bytes"));

    let request = Request::builder()
        .uri("/tiles/5/10/12.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    // Immediate 200 with the exact placeholder bytes
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/png"
    );
    assert_eq!(
        response.headers().get("x-tile-cache-hit").unwrap(),
        "false"
    );
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, app.placeholder_bytes());
    assert!(is_valid_png(&body));

    // Within a bounded window the tile file comes to exist
    app.proxy.wait_for_fills().await;
    assert!(app.cached_file(coord).is_file());
    assert_eq!(
        std::fs::read(app.cached_file(coord)).unwrap(),
        b"real tile bytes"
    );
}

#[tokio::test]
async fn test_hit_serves_cached_bytes() {
    let coord = TileCoord::new(5, 10, 12);
    let app = TestApp::new(MockFetcher::new().with_tile(coord, b"real tile bytes"));

    // Prime the cache through a miss
    let request = Request::builder()
        .uri("/tiles/5/10/12.png")
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap();
    app.proxy.wait_for_fills().await;

    // Second request is a hit with the exact upstream bytes
    let request = Request::builder()
        .uri("/tiles/5/10/12.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-tile-cache-hit").unwrap(), "true");
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), b"real tile bytes");
}

#[tokio::test]
async fn test_tile_without_png_extension() {
    let coord = TileCoord::new(1, 2, 3);
    let app = TestApp::new(MockFetcher::new().with_tile(coord, b"t"));

    let request = Request::builder()
        .uri("/tiles/1/2/3")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Coordinate Validation
// =============================================================================

#[tokio::test]
async fn test_non_numeric_zoom_rejected() {
    let app = TestApp::new(MockFetcher::new());

    let request = Request::builder()
        .uri("/tiles/abc/10/12.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_y_rejected() {
    let app = TestApp::new(MockFetcher::new());

    let request = Request::builder()
        .uri("/tiles/5/10/notanumber.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // No fill may be spawned for a rejected coordinate
    app.proxy.wait_for_fills().await;
    assert_eq!(app.proxy.in_flight().await, 0);
}

#[tokio::test]
async fn test_negative_coordinate_rejected() {
    let app = TestApp::new(MockFetcher::new());

    let request = Request::builder()
        .uri("/tiles/5/-3/12.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Upstream Failures
// =============================================================================

#[tokio::test]
async fn test_upstream_404_creates_no_file_and_stays_silent() {
    let coord = TileCoord::new(5, 10, 12);
    let app = TestApp::new(MockFetcher::new().with_status(coord, 404));

    let request = Request::builder()
        .uri("/tiles/5/10/12.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    // Client still gets its placeholder
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, app.placeholder_bytes());

    // Failed fill leaves no trace on disk
    app.proxy.wait_for_fills().await;
    assert!(!app.cached_file(coord).exists());

    // A later request serves the placeholder again and retries the fetch
    let request = Request::builder()
        .uri("/tiles/5/10/12.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("x-tile-cache-hit").unwrap(),
        "false"
    );
    app.proxy.wait_for_fills().await;
    assert_eq!(app.proxy.fetcher().fetch_count(), 2);
}

#[tokio::test]
async fn test_upstream_transport_failure_stays_silent() {
    let coord = TileCoord::new(3, 3, 3);
    let app = TestApp::new(MockFetcher::new().with_transport_failure(coord));

    let request = Request::builder()
        .uri("/tiles/3/3/3.png")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    app.proxy.wait_for_fills().await;
    assert!(!app.cached_file(coord).exists());
}

// =============================================================================
// Health & Routing
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new(MockFetcher::new());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let health: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new(MockFetcher::new());

    let request = Request::builder()
        .uri("/no/such/route")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
