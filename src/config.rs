//! Configuration management for tile-relay.
//!
//! This module provides a flexible configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `TILE_` prefix
//! - Sensible defaults for all optional settings
//!
//! Configuration is parsed once at startup and flows into components as
//! immutable data; nothing reads the environment after that.
//!
//! # Environment Variables
//!
//! - `TILE_HOST` - Server bind address (default: 0.0.0.0)
//! - `TILE_PORT` - Server port (default: 3000)
//! - `TILE_CACHE_DIR` - Tile cache root directory (default: tiles)
//! - `TILE_UPSTREAM_URL` - Upstream URL template with {z}/{x}/{y} (required)
//! - `TILE_UPSTREAM_TOKEN` - Static access token for the upstream
//! - `TILE_PLACEHOLDER` - Path to the placeholder PNG
//! - `TILE_FRONTEND_DIR` - Static frontend directory
//! - `TILE_FETCH_TIMEOUT` - Upstream fetch timeout in seconds (0 = none)
//! - `TILE_CACHE_MAX_AGE` - HTTP cache max-age seconds (default: 3600)
//! - `TILE_CORS_ORIGINS` - Allowed CORS origins, comma separated

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::fetch::UpstreamConfig;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default cache root directory, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = "tiles";

/// Default HTTP cache max-age in seconds (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: u32 = 3600;

// =============================================================================
// CLI Arguments
// =============================================================================

/// tile-relay - A caching proxy for map raster tiles.
///
/// Serves tiles from a local disk cache. Misses are answered instantly with
/// a placeholder image while the real tile is fetched from the upstream
/// provider in the background and cached for future requests.
#[derive(Parser, Debug, Clone)]
#[command(name = "tile-relay")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "TILE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "TILE_PORT")]
    pub port: u16,

    // =========================================================================
    // Cache Configuration
    // =========================================================================
    /// Root directory of the on-disk tile cache.
    ///
    /// Created on demand; grows without bound (no eviction).
    #[arg(long, default_value = DEFAULT_CACHE_DIR, env = "TILE_CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// HTTP Cache-Control max-age in seconds for cache hits.
    #[arg(long, default_value_t = DEFAULT_CACHE_MAX_AGE, env = "TILE_CACHE_MAX_AGE")]
    pub cache_max_age: u32,

    // =========================================================================
    // Upstream Configuration
    // =========================================================================
    /// Upstream tile URL template. Must contain {z}, {x} and {y} placeholders.
    ///
    /// Example: https://tiles.example.com/satellite/{z}/{x}/{y}.png
    #[arg(long, env = "TILE_UPSTREAM_URL")]
    pub upstream_url: String,

    /// Static access token, appended to upstream requests as `access_token`.
    #[arg(long, env = "TILE_UPSTREAM_TOKEN")]
    pub upstream_token: Option<String>,

    /// Upstream fetch timeout in seconds. 0 disables the timeout; a hung
    /// fetch then ties up only its own background task.
    #[arg(long, default_value_t = 0, env = "TILE_FETCH_TIMEOUT")]
    pub fetch_timeout: u64,

    // =========================================================================
    // Placeholder Configuration
    // =========================================================================
    /// Path to the placeholder PNG served on cache misses.
    ///
    /// When omitted, a built-in transparent tile is used. An unreadable file
    /// is a fatal startup error.
    #[arg(long, env = "TILE_PLACEHOLDER")]
    pub placeholder: Option<PathBuf>,

    // =========================================================================
    // Frontend Configuration
    // =========================================================================
    /// Directory of static frontend assets to serve alongside the tile API.
    #[arg(long, env = "TILE_FRONTEND_DIR")]
    pub frontend_dir: Option<PathBuf>,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated). If not specified, allows any
    /// origin.
    #[arg(long, env = "TILE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.upstream_url.is_empty() {
            return Err(
                "Upstream URL template is required. Set --upstream-url or TILE_UPSTREAM_URL"
                    .to_string(),
            );
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.upstream_url.contains(placeholder) {
                return Err(format!(
                    "Upstream URL template must contain the {} placeholder",
                    placeholder
                ));
            }
        }

        // The template must produce a parseable URL once substituted
        let probe = self
            .upstream_url
            .replace("{z}", "0")
            .replace("{x}", "0")
            .replace("{y}", "0");
        url::Url::parse(&probe)
            .map_err(|e| format!("Upstream URL template is not a valid URL: {}", e))?;

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the upstream configuration for the HTTP fetcher.
    pub fn upstream_config(&self) -> UpstreamConfig {
        let mut upstream = UpstreamConfig::new(self.upstream_url.clone());
        if let Some(ref token) = self.upstream_token {
            upstream = upstream.with_access_token(token.clone());
        }
        if self.fetch_timeout > 0 {
            upstream = upstream.with_timeout(Duration::from_secs(self.fetch_timeout));
        }
        upstream
    }
}

// =============================================================================
// Tests
// =============================================================================
