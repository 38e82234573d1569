//! HTTP request handlers for the tile proxy and the telemetry sink.
//!
//! # Endpoints
//!
//! - `GET /tiles/{z}/{x}/{y}.png` - Serve a tile (cached or placeholder)
//! - `GET /health` - Health check endpoint
//! - `POST /` - Receive a telemetry payload
//! - `GET /data` - Serve the last received telemetry payload

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::coord::TileCoord;
use crate::error::StoreError;
use crate::fetch::TileFetcher;
use crate::proxy::TileProxy;
use crate::store::TileStore;
use crate::telemetry::TelemetrySink;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state, passed to all handlers via Axum's State.
pub struct AppState<S: TileStore, F: TileFetcher> {
    /// The tile proxy service
    pub proxy: Arc<TileProxy<S, F>>,

    /// The telemetry sink
    pub telemetry: Arc<TelemetrySink>,

    /// Cache-Control max-age for cache hits, in seconds
    pub cache_max_age: u32,
}

impl<S: TileStore, F: TileFetcher> AppState<S, F> {
    /// Create application state with the default cache max-age (1 hour).
    pub fn new(proxy: Arc<TileProxy<S, F>>, telemetry: Arc<TelemetrySink>) -> Self {
        Self {
            proxy,
            telemetry,
            cache_max_age: 3600, // 1 hour default
        }
    }

    /// Create application state with a custom cache max-age.
    pub fn with_cache_max_age(
        proxy: Arc<TileProxy<S, F>>,
        telemetry: Arc<TelemetrySink>,
        cache_max_age: u32,
    ) -> Self {
        Self {
            proxy,
            telemetry,
            cache_max_age,
        }
    }
}

impl<S: TileStore, F: TileFetcher> Clone for AppState<S, F> {
    fn clone(&self) -> Self {
        Self {
            proxy: Arc::clone(&self.proxy),
            telemetry: Arc::clone(&self.telemetry),
            cache_max_age: self.cache_max_age,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Path parameters for tile requests.
///
/// Extracted from: `/tiles/{z}/{x}/{filename}` where filename is `{y}.png`
/// (a bare `{y}` is accepted too).
#[derive(Debug, Deserialize)]
pub struct TilePathParams {
    /// Zoom level
    pub z: u32,

    /// Tile X coordinate
    pub x: u32,

    /// Tile Y coordinate with optional .png extension (e.g. "12" or "12.png")
    pub filename: String,
}

impl TilePathParams {
    /// Parse the Y coordinate from the filename, stripping any .png extension.
    pub fn y(&self) -> Result<u32, std::num::ParseIntError> {
        let y_str = self.filename.strip_suffix(".png").unwrap_or(&self.filename);
        y_str.parse()
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Failures on the synchronous tile request path.
///
/// Malformed coordinates become a 400; a cache read failure on the hit path
/// becomes a 500 with a plain-text body. Background fill failures never
/// appear here, the client already has its placeholder by then.
#[derive(Debug)]
pub enum TileRequestError {
    /// The y path segment was not a non-negative integer
    InvalidCoordinate(String),

    /// Reading an existing cached tile failed
    Store(StoreError),
}

impl From<StoreError> for TileRequestError {
    fn from(err: StoreError) -> Self {
        TileRequestError::Store(err)
    }
}

impl IntoResponse for TileRequestError {
    fn into_response(self) -> Response {
        match self {
            TileRequestError::InvalidCoordinate(segment) => {
                warn!(segment = %segment, "Rejected malformed tile coordinate");
                (StatusCode::BAD_REQUEST, "Invalid tile coordinate").into_response()
            }
            TileRequestError::Store(err) => {
                error!("Cache read failed on hit path: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle tile requests.
///
/// # Endpoint
///
/// `GET /tiles/{z}/{x}/{y}.png`
///
/// # Response
///
/// - `200 OK`: PNG bytes with `Content-Type: image/png`. Cached bytes on a
///   hit; the placeholder on a miss, with a background fill spawned for the
///   coordinate after the response is produced.
/// - `400 Bad Request`: non-numeric z, x or y segment
/// - `500 Internal Server Error`: cache read failure on the hit path
///
/// # Headers
///
/// - `X-Tile-Cache-Hit: true|false`
/// - `Cache-Control: public, max-age={n}` on hits, `no-store` on placeholder
///   responses so viewers re-request the tile once it has been filled
pub async fn tile_handler<S: TileStore, F: TileFetcher>(
    State(state): State<AppState<S, F>>,
    Path(params): Path<TilePathParams>,
) -> Result<Response, TileRequestError> {
    let y = params
        .y()
        .map_err(|_| TileRequestError::InvalidCoordinate(params.filename.clone()))?;
    let coord = TileCoord::new(params.z, params.x, y);

    let tile = state.proxy.get_tile(coord).await?;

    let cache_control = if tile.cache_hit {
        format!("public, max-age={}", state.cache_max_age)
    } else {
        "no-store".to_string()
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, cache_control)
        .header("X-Tile-Cache-Hit", tile.cache_hit.to_string())
        .body(axum::body::Body::from(tile.data))
        .unwrap();

    Ok(response)
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Receive a telemetry payload.
///
/// # Endpoint
///
/// `POST /`
///
/// Any body that parses as JSON is accepted and overwrites the single
/// stored snapshot. Responds `200` with `{"status":"ok"}`.
pub async fn telemetry_post_handler<S: TileStore, F: TileFetcher>(
    State(state): State<AppState<S, F>>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    state.telemetry.store(payload).await;
    Json(json!({"status": "ok"}))
}

/// Serve the last received telemetry payload.
///
/// # Endpoint
///
/// `GET /data`
///
/// # Response
///
/// - `200 OK` with the last stored JSON document
/// - `404 Not Found` with `{"error":"No telemetry data received yet"}` when
///   nothing has ever been posted
pub async fn telemetry_get_handler<S: TileStore, F: TileFetcher>(
    State(state): State<AppState<S, F>>,
) -> Response {
    match state.telemetry.last().await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "No telemetry data received yet"})),
        )
            .into_response(),
    }
}

// =============================================================================
// Tests
// =============================================================================
