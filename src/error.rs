use thiserror::Error;

/// Errors from the on-disk tile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No cached file exists for the coordinate
    #[error("Tile not cached: {0}")]
    NotFound(String),

    /// Underlying filesystem error (permissions, disk full, ...)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the remote tile fetcher.
///
/// The fetcher performs no retries; these errors are the caller's to handle.
/// On the background fill path they are logged and dropped.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered with a non-success HTTP status
    #[error("Upstream returned HTTP {status} for tile {coord}")]
    Status { status: u16, coord: String },

    /// DNS, connection, or timeout failure before a status was received
    #[error("Transport error fetching tile {coord}: {message}")]
    Transport { coord: String, message: String },

    /// The URL produced from the template is not a valid URL
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

/// Startup-only error for the placeholder image.
///
/// The placeholder is loaded once at process start; if the configured file
/// cannot be read the server refuses to start. There is no per-request
/// failure path.
#[derive(Debug, Error)]
pub enum PlaceholderError {
    #[error("Failed to read placeholder image {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },
}

// =============================================================================
// Tests
// =============================================================================
