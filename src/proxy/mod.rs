//! The cache-or-fetch tile proxy.
//!
//! This module is the heart of the system: the per-request decision between
//! serving a cached tile and answering instantly with the placeholder while
//! a detached background task fetches and persists the real tile.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TileProxy                            │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                    get_tile()                         │  │
//! │  │  1. Read from store     HIT  → cached bytes           │  │
//! │  │  2. On miss             MISS → placeholder bytes      │  │
//! │  │  3. Spawn fill (deduplicated per coordinate)          │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │         │                  │                   │            │
//! │         ▼                  ▼                   ▼            │
//! │   ┌───────────┐     ┌─────────────┐     ┌─────────────┐     │
//! │   │ TileStore │     │ TileFetcher │     │ Placeholder │     │
//! │   └───────────┘     └─────────────┘     └─────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileProxy`]: orchestrates store, fetcher and placeholder per request
//! - [`TileResponse`]: tile bytes plus whether they came from the cache

mod service;

pub use service::{TileProxy, TileResponse};
