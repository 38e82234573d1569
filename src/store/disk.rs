//! Disk-backed tile store.
//!
//! Tiles live under a cache root directory, one file per coordinate at
//! `{root}/{z}/{x}/{y}.png`. A cached file is created exactly once per
//! coordinate by a background fill and is never updated or deleted by this
//! system (no TTL, no eviction; unbounded growth is an accepted non-goal).
//!
//! Writes go to a temporary file in the target directory and are renamed
//! into place, so a crash mid-write can never leave a truncated file that a
//! later `exists` check would mistake for a valid tile.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::coord::TileCoord;
use crate::error::StoreError;

use super::TileStore;

/// Tile store rooted at a directory on the local filesystem.
pub struct DiskTileStore {
    /// Root of the cache directory tree
    root: PathBuf,

    /// Sequence number making temp file names unique across concurrent writes
    write_seq: AtomicU64,
}

impl DiskTileStore {
    /// Create a store rooted at `root`.
    ///
    /// The directory itself is created lazily on first write; a store over a
    /// nonexistent root simply reports every coordinate as a miss.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_seq: AtomicU64::new(0),
        }
    }

    /// The cache root directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn tile_path(&self, coord: TileCoord) -> PathBuf {
        coord.cache_path(&self.root)
    }
}

#[async_trait]
impl TileStore for DiskTileStore {
    async fn exists(&self, coord: TileCoord) -> bool {
        // try_exists maps missing intermediate directories to Ok(false)
        tokio::fs::try_exists(self.tile_path(coord))
            .await
            .unwrap_or(false)
    }

    async fn read(&self, coord: TileCoord) -> Result<Bytes, StoreError> {
        let path = self.tile_path(coord);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(coord.to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write(&self, coord: TileCoord, data: Bytes) -> Result<(), StoreError> {
        let path = self.tile_path(coord);

        if let Some(parent) = path.parent() {
            // Non-fatal when the directory already exists; racing fills may
            // create the same path concurrently.
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a unique temp file in the same directory, then rename.
        // Rename within one filesystem is atomic, so readers either see the
        // old state or the complete new file.
        let seq = self.write_seq.fetch_add(1, Ordering::Relaxed);
        let tmp_path = path.with_extension(format!("png.tmp{}", seq));

        tokio::fs::write(&tmp_path, &data).await?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            // Best-effort cleanup of the orphaned temp file
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(StoreError::Io(e));
        }

        debug!(tile = %coord, bytes = data.len(), "Cached tile written");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
