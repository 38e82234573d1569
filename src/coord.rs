//! Tile coordinates and the on-disk naming function.
//!
//! A tile is addressed by a `(zoom, x, y)` triple. The coordinate doubles as
//! the cache key: its derived path is `{cache_root}/{z}/{x}/{y}.png`. The
//! path is recomputed on every request; nothing about it is persisted.
//!
//! Coordinates are plain non-negative integers. No range validation against
//! the zoom level is performed; any `u32` triple is accepted and stored
//! verbatim as path segments. Because the segments are integers (never raw
//! request strings), crafted path-traversal values cannot reach the
//! filesystem layer.

use std::fmt;
use std::path::{Path, PathBuf};

/// Address of a single map tile within one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level (0 = whole world in one tile)
    pub z: u32,

    /// Tile column, 0-indexed from the west
    pub x: u32,

    /// Tile row, 0-indexed from the north
    pub y: u32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Derive the cache file path for this coordinate under `cache_root`.
    ///
    /// Layout: `{cache_root}/{z}/{x}/{y}.png`.
    pub fn cache_path(&self, cache_root: &Path) -> PathBuf {
        cache_root
            .join(self.z.to_string())
            .join(self.x.to_string())
            .join(format!("{}.png", self.y))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

// =============================================================================
// Tests
// =============================================================================
