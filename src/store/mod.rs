//! Persistent tile storage.
//!
//! The store maps a [`TileCoord`](crate::coord::TileCoord) to a file on disk
//! and answers presence checks, reads, and writes. It is shared between the
//! request handlers (reads) and the background fill tasks (writes).
//!
//! # Components
//!
//! - [`TileStore`]: the storage trait, the seam used by the proxy service
//! - [`DiskTileStore`]: filesystem implementation under a cache root directory

mod disk;

pub use disk::DiskTileStore;

use async_trait::async_trait;
use bytes::Bytes;

use crate::coord::TileCoord;
use crate::error::StoreError;

/// Storage backend for cached tiles.
///
/// Implementations must tolerate concurrent readers and concurrent writers
/// for the same coordinate: the outcome of racing writers is last-write-wins,
/// and a reader never observes a partially written file.
#[async_trait]
pub trait TileStore: Send + Sync + 'static {
    /// True iff a complete tile file is present for the coordinate.
    ///
    /// Missing intermediate directories are an ordinary cache miss, never an
    /// error.
    async fn exists(&self, coord: TileCoord) -> bool;

    /// Read the cached bytes for the coordinate.
    ///
    /// Returns [`StoreError::NotFound`] when no file exists at the derived
    /// path.
    async fn read(&self, coord: TileCoord) -> Result<Bytes, StoreError>;

    /// Persist the full tile content for the coordinate.
    ///
    /// Parent directories are created as needed. The write must be atomic:
    /// either the complete content becomes visible at the derived path or
    /// the previous state is preserved.
    async fn write(&self, coord: TileCoord, data: Bytes) -> Result<(), StoreError>;
}
