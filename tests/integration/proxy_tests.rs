//! Concurrency tests for the cache-fill path.
//!
//! Tests verify:
//! - Concurrent misses for one coordinate collapse into a single fetch
//! - Independent coordinates fill independently
//! - The on-disk result of racing requests is one complete fetch result

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use tile_relay::TileCoord;

use super::test_utils::{MockFetcher, TestApp};

#[tokio::test]
async fn test_concurrent_misses_fetch_once() {
    let coord = TileCoord::new(7, 40, 50);
    let fetcher = MockFetcher::new()
        .with_tile(coord, b"tile payload")
        .with_delay(Duration::from_millis(50));
    let app = TestApp::new(fetcher);

    // Fire a burst of identical requests before any fill can finish
    let mut handles = Vec::new();
    for _ in 0..12 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .uri("/tiles/7/40/50.png")
                .body(Body::empty())
                .unwrap();
            router.oneshot(request).await.unwrap()
        }));
    }

    // Every client gets a 200, whether it raced into the miss window or
    // landed after the fill completed
    for handle in handles {
        let response = handle.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    app.proxy.wait_for_fills().await;

    // One fetch, one complete file
    assert_eq!(app.proxy.fetcher().fetch_count(), 1);
    assert_eq!(
        std::fs::read(app.cached_file(coord)).unwrap(),
        b"tile payload"
    );
}

#[tokio::test]
async fn test_distinct_coordinates_fetch_independently() {
    let a = TileCoord::new(1, 0, 0);
    let b = TileCoord::new(1, 1, 0);
    let fetcher = MockFetcher::new()
        .with_tile(a, b"tile a")
        .with_tile(b, b"tile b")
        .with_delay(Duration::from_millis(20));
    let app = TestApp::new(fetcher);

    for uri in ["/tiles/1/0/0.png", "/tiles/1/1/0.png"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    app.proxy.wait_for_fills().await;

    assert_eq!(app.proxy.fetcher().fetch_count(), 2);
    assert_eq!(std::fs::read(app.cached_file(a)).unwrap(), b"tile a");
    assert_eq!(std::fs::read(app.cached_file(b)).unwrap(), b"tile b");
}

#[tokio::test]
async fn test_refill_after_cache_hit_never_happens() {
    let coord = TileCoord::new(2, 2, 2);
    let app = TestApp::new(MockFetcher::new().with_tile(coord, b"tile"));

    // Miss, fill, then several hits
    let request = Request::builder()
        .uri("/tiles/2/2/2.png")
        .body(Body::empty())
        .unwrap();
    app.router.clone().oneshot(request).await.unwrap();
    app.proxy.wait_for_fills().await;

    for _ in 0..3 {
        let request = Request::builder()
            .uri("/tiles/2/2/2.png")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get("x-tile-cache-hit").unwrap(), "true");
    }

    app.proxy.wait_for_fills().await;
    assert_eq!(app.proxy.fetcher().fetch_count(), 1);
}
