//! HTTP server layer.
//!
//! This module provides the HTTP API: the tile endpoint, the health check,
//! and the telemetry sink endpoints.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          HTTP Layer                            │
//! │              GET /tiles/{z}/{x}/{y}.png                        │
//! │                                                                │
//! │  ┌─────────────┐  ┌──────────────────┐  ┌───────────────────┐  │
//! │  │  handlers   │  │     routes       │  │     AppState      │  │
//! │  │ (requests)  │  │ (router config)  │  │ (proxy+telemetry) │  │
//! │  └─────────────┘  └──────────────────┘  └───────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, telemetry_get_handler, telemetry_post_handler, tile_handler, AppState,
    HealthResponse, TilePathParams, TileRequestError,
};
pub use routes::{create_default_router, create_router, RouterConfig};
