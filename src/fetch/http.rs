//! HTTP tile fetcher backed by reqwest.
//!
//! The upstream provider is described by a URL template containing `{z}`,
//! `{x}` and `{y}` placeholders, plus an optional static access token that
//! is appended as an `access_token` query parameter. Both are loaded once at
//! startup and held immutably for the life of the process.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::coord::TileCoord;
use crate::error::FetchError;

use super::TileFetcher;

// =============================================================================
// Upstream Configuration
// =============================================================================

/// Immutable description of the upstream tile provider.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// URL template with `{z}`, `{x}`, `{y}` placeholders
    pub url_template: String,

    /// Static credential appended as `access_token`, if the provider needs one
    pub access_token: Option<String>,

    /// Per-request timeout; `None` leaves the request unbounded
    pub timeout: Option<Duration>,
}

impl UpstreamConfig {
    /// Create a config for a template with no credential and no timeout.
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            access_token: None,
            timeout: None,
        }
    }

    /// Attach a static access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Bound each upstream request to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Substitute a coordinate into the template and parse the result.
    pub fn url_for(&self, coord: TileCoord) -> Result<Url, FetchError> {
        let raw = self
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        if let Some(ref token) = self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }

        Ok(url)
    }
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// Fetches tiles from an HTTP tile provider.
pub struct HttpTileFetcher {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpTileFetcher {
    /// Create a fetcher for the given upstream.
    ///
    /// The underlying client is connection-pooled and shared by every
    /// background fill task.
    pub fn new(config: UpstreamConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            // Builder only fails with a misconfigured TLS backend, which is
            // compiled in; fall back to the default client in that case.
            client: builder.build().unwrap_or_default(),
            config,
        }
    }

    /// The upstream configuration this fetcher was built with.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }
}

#[async_trait]
impl TileFetcher for HttpTileFetcher {
    async fn fetch(&self, coord: TileCoord) -> Result<Bytes, FetchError> {
        let url = self.config.url_for(coord)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                coord: coord.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                coord: coord.to_string(),
            });
        }

        // Full body, no size cap; the upstream is trusted to send tiles
        response.bytes().await.map_err(|e| FetchError::Transport {
            coord: coord.to_string(),
            message: e.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
