//! Router configuration for the tile proxy.
//!
//! # Route Structure
//!
//! ```text
//! /tiles/{z}/{x}/{y}.png   - Tile endpoint (cache-or-placeholder)
//! /health                  - Health check
//! /                        - POST: telemetry intake; GET: frontend index (optional)
//! /data                    - Last telemetry snapshot
//! /*                       - Optional static frontend assets (fallback)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::fetch::TileFetcher;
use crate::proxy::TileProxy;
use crate::store::TileStore;

use crate::telemetry::TelemetrySink;

use super::handlers::{
    health_handler, telemetry_get_handler, telemetry_post_handler, tile_handler, AppState,
};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Cache-Control max-age in seconds for tile cache hits
    pub cache_max_age: u32,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Optional directory of static frontend assets
    pub frontend_dir: Option<PathBuf>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a configuration with defaults: 1 hour cache max-age, any CORS
    /// origin, no frontend directory, tracing enabled.
    pub fn new() -> Self {
        Self {
            cache_max_age: 3600,
            cors_origins: None,
            frontend_dir: None,
            enable_tracing: true,
        }
    }

    /// Set the Cache-Control max-age for tile cache hits.
    pub fn with_cache_max_age(mut self, seconds: u32) -> Self {
        self.cache_max_age = seconds;
        self
    }

    /// Set specific allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Serve static frontend assets from `dir`.
    pub fn with_frontend_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frontend_dir = Some(dir.into());
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// Builds the complete Axum router: the tile endpoint, health check,
/// telemetry intake and readback, optional static frontend, CORS and
/// optional request tracing.
pub fn create_router<S, F>(
    proxy: Arc<TileProxy<S, F>>,
    telemetry: Arc<TelemetrySink>,
    config: RouterConfig,
) -> Router
where
    S: TileStore,
    F: TileFetcher,
{
    // Create application state
    let state = AppState::with_cache_max_age(proxy, telemetry, config.cache_max_age);

    let cors = build_cors_layer(&config);

    // POST / is telemetry intake. When a frontend directory is configured,
    // GET / serves its index and unmatched paths fall through to the asset
    // directory.
    let root = match config.frontend_dir {
        Some(ref dir) => post(telemetry_post_handler::<S, F>)
            .get_service(ServeFile::new(dir.join("index.html"))),
        None => post(telemetry_post_handler::<S, F>),
    };

    let mut router = Router::new()
        .route("/tiles/{z}/{x}/{filename}", get(tile_handler::<S, F>))
        .route("/health", get(health_handler))
        .route("/", root)
        .route("/data", get(telemetry_get_handler::<S, F>));

    if let Some(ref dir) = config.frontend_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    let router = router.with_state(state).layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            // Parse origins into HeaderValues
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Create a router with default configuration around an existing proxy.
pub fn create_default_router<S, F>(proxy: Arc<TileProxy<S, F>>) -> Router
where
    S: TileStore,
    F: TileFetcher,
{
    create_router(proxy, Arc::new(TelemetrySink::new()), RouterConfig::new())
}

// =============================================================================
// Tests
// =============================================================================
