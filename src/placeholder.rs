//! The fallback image served on every cache miss.
//!
//! The placeholder is a single immutable PNG loaded once at process start
//! and reused for all miss responses; it is never written into the cache
//! directory. A configured placeholder file that cannot be read is a fatal
//! startup error, not a per-request error. When no file is configured, a
//! built-in fully transparent 1x1 PNG is used, which map viewers render as
//! an empty tile until the real one arrives.

use std::path::Path;

use bytes::Bytes;

use crate::error::PlaceholderError;

/// A complete, minimal, fully transparent 1x1 PNG.
const TRANSPARENT_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
    0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, // 8-bit RGBA
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, // IDAT
    0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, //
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, //
    0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, // IEND
    0x42, 0x60, 0x82,
];

/// The static miss-response image.
#[derive(Debug, Clone)]
pub struct Placeholder {
    data: Bytes,
}

impl Placeholder {
    /// Load the placeholder from a PNG file.
    ///
    /// Called once at startup; an unreadable file aborts startup.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PlaceholderError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| PlaceholderError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            data: Bytes::from(data),
        })
    }

    /// The built-in transparent 1x1 PNG.
    pub fn transparent() -> Self {
        Self {
            data: Bytes::from_static(TRANSPARENT_PNG),
        }
    }

    /// The placeholder bytes. Cloning `Bytes` is a cheap refcount bump, so
    /// every miss response shares the same underlying buffer.
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
