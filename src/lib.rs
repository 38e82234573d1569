//! # tile-relay
//!
//! A caching proxy for map raster tiles.
//!
//! Tiles are addressed by `(zoom, x, y)` and served from a local on-disk
//! cache. A request for a tile that is not yet cached is answered instantly
//! with a static placeholder image while the real tile is fetched from the
//! upstream provider in a detached background task and persisted for future
//! requests. Response latency is therefore bounded by a local file read and
//! independent of upstream availability.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`coord`] - Tile coordinates and the on-disk naming function
//! - [`store`] - Persistent tile storage with atomic writes
//! - [`fetch`] - Remote tile retrieval over HTTP
//! - [`proxy`] - The cache-or-fetch decision and background fills
//! - [`placeholder`] - The static miss-response image
//! - [`telemetry`] - Single-slot JSON telemetry sink (collaborator service)
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use tile_relay::{
//!     DiskTileStore, HttpTileFetcher, Placeholder, RouterConfig, TelemetrySink, TileProxy,
//!     UpstreamConfig, create_router,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DiskTileStore::new("tiles");
//!     let fetcher = HttpTileFetcher::new(
//!         UpstreamConfig::new("https://tiles.example.com/{z}/{x}/{y}.png"),
//!     );
//!     let proxy = Arc::new(TileProxy::new(store, fetcher, Placeholder::transparent()));
//!
//!     let router = create_router(proxy, Arc::new(TelemetrySink::new()), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod coord;
pub mod error;
pub mod fetch;
pub mod placeholder;
pub mod proxy;
pub mod server;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use coord::TileCoord;
pub use error::{FetchError, PlaceholderError, StoreError};
pub use fetch::{HttpTileFetcher, TileFetcher, UpstreamConfig};
pub use placeholder::Placeholder;
pub use proxy::{TileProxy, TileResponse};
pub use server::{create_router, AppState, RouterConfig};
pub use store::{DiskTileStore, TileStore};
pub use telemetry::TelemetrySink;
