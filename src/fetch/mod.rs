//! Remote tile retrieval.
//!
//! The fetcher turns a tile coordinate into an upstream URL and retrieves
//! the tile bytes over HTTP. It distinguishes status failures (the upstream
//! answered, but not with the tile) from transport failures (DNS, connect,
//! timeout) and performs no retries; retry policy, if any, belongs to the
//! caller. In this system a failed background fetch is logged and dropped.
//!
//! # Components
//!
//! - [`TileFetcher`]: the retrieval trait, the seam used by the proxy service
//! - [`HttpTileFetcher`]: reqwest-based implementation driven by a URL template

mod http;

pub use http::{HttpTileFetcher, UpstreamConfig};

use async_trait::async_trait;
use bytes::Bytes;

use crate::coord::TileCoord;
use crate::error::FetchError;

/// Source of tile bytes for coordinates missing from the cache.
#[async_trait]
pub trait TileFetcher: Send + Sync + 'static {
    /// Fetch the full tile image for the coordinate.
    ///
    /// On success returns the complete response body. Fails with
    /// [`FetchError::Status`] for a non-success upstream status and
    /// [`FetchError::Transport`] when no status was received.
    async fn fetch(&self, coord: TileCoord) -> Result<Bytes, FetchError>;
}
