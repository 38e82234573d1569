//! Tile proxy service: cache-hit vs miss-with-background-fill.
//!
//! Per incoming request the proxy runs a small state machine:
//! `START → CACHE_CHECK → {HIT | MISS}`. A hit streams the cached bytes. A
//! miss answers with the placeholder immediately and enqueues a background
//! fill; the handler never waits for the fill, so response latency is bound
//! by a local file read regardless of upstream health. The first request for
//! any tile therefore sees the placeholder, an intentional trade-off for a
//! viewer that re-requests tiles as the user pans.
//!
//! Concurrent misses for the same coordinate collapse into a single fill via
//! a keyed in-flight registry, so a popular missing tile costs one upstream
//! fetch and one disk write, not one per request. Fill failures are logged
//! and dropped; the coordinate stays a miss and the next request triggers a
//! fresh attempt.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::coord::TileCoord;
use crate::error::StoreError;
use crate::fetch::TileFetcher;
use crate::placeholder::Placeholder;
use crate::store::TileStore;

// =============================================================================
// Tile Response
// =============================================================================

/// Response from the tile proxy.
#[derive(Debug, Clone)]
pub struct TileResponse {
    /// PNG bytes: the cached tile on a hit, the placeholder on a miss
    pub data: Bytes,

    /// Whether `data` came from the cache
    pub cache_hit: bool,
}

// =============================================================================
// Tile Proxy
// =============================================================================

/// Registry of background fills, keyed by coordinate.
///
/// The mutex is never held across an await point. A fill task removes its
/// own entry on completion; because insertion happens under the same lock
/// that removal must take, a task can never observe the registry before its
/// own handle is registered.
type InflightRegistry = Arc<Mutex<HashMap<TileCoord, JoinHandle<()>>>>;

/// The cache-or-fetch proxy service.
///
/// # Type Parameters
///
/// * `S` - Persistent tile storage
/// * `F` - Remote tile source
pub struct TileProxy<S: TileStore, F: TileFetcher> {
    store: Arc<S>,
    fetcher: Arc<F>,
    placeholder: Placeholder,
    inflight: InflightRegistry,
}

impl<S: TileStore, F: TileFetcher> TileProxy<S, F> {
    /// Create a proxy over the given store and fetcher.
    pub fn new(store: S, fetcher: F, placeholder: Placeholder) -> Self {
        Self {
            store: Arc::new(store),
            fetcher: Arc::new(fetcher),
            placeholder,
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Serve a tile request.
    ///
    /// Returns the cached bytes on a hit. On a miss, returns the placeholder
    /// bytes and spawns a background fill for the coordinate; the caller is
    /// never blocked on the upstream.
    ///
    /// # Errors
    ///
    /// Only synchronous cache-read failures (other than a plain miss) are
    /// surfaced; background failures never reach a client.
    pub async fn get_tile(&self, coord: TileCoord) -> Result<TileResponse, StoreError> {
        match self.store.read(coord).await {
            Ok(data) => {
                debug!(tile = %coord, "Serving tile from cache");
                Ok(TileResponse {
                    data,
                    cache_hit: true,
                })
            }
            Err(StoreError::NotFound(_)) => {
                self.spawn_fill(coord).await;
                Ok(TileResponse {
                    data: self.placeholder.bytes(),
                    cache_hit: false,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Enqueue a background fill for `coord` unless one is already running.
    async fn spawn_fill(&self, coord: TileCoord) {
        let mut inflight = self.inflight.lock().await;
        if inflight.contains_key(&coord) {
            debug!(tile = %coord, "Fill already in flight, not spawning another");
            return;
        }

        let store = Arc::clone(&self.store);
        let fetcher = Arc::clone(&self.fetcher);
        let registry = Arc::clone(&self.inflight);

        let handle = tokio::spawn(async move {
            fill_tile(store.as_ref(), fetcher.as_ref(), coord).await;
            registry.lock().await.remove(&coord);
        });

        inflight.insert(coord, handle);
    }

    /// Number of background fills currently in flight.
    pub async fn in_flight(&self) -> usize {
        self.inflight.lock().await.len()
    }

    /// Await every tracked background fill.
    ///
    /// Used at shutdown to drain in-flight work deliberately instead of
    /// abandoning it, and by tests that need fills to have settled. Fills
    /// spawned while draining are awaited too.
    pub async fn wait_for_fills(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut inflight = self.inflight.lock().await;
                inflight.drain().map(|(_, handle)| handle).collect()
            };
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                // A panicked fill task only loses that one tile
                let _ = handle.await;
            }
        }
    }

    /// The placeholder served on misses.
    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// The underlying tile store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The underlying tile fetcher.
    pub fn fetcher(&self) -> &Arc<F> {
        &self.fetcher
    }
}

// =============================================================================
// Background Fill
// =============================================================================

/// Fetch a missing tile and persist it.
///
/// Runs detached from any request. Every failure here is terminal for this
/// task alone: it is logged, nothing is written, no client is notified, and
/// the coordinate remains eligible for a fresh attempt on the next miss.
async fn fill_tile<S: TileStore, F: TileFetcher>(store: &S, fetcher: &F, coord: TileCoord) {
    // A fill completed by someone else between the miss and this task
    // starting makes the fetch redundant.
    if store.exists(coord).await {
        debug!(tile = %coord, "Tile appeared in cache before fill started, skipping");
        return;
    }

    let data = match fetcher.fetch(coord).await {
        Ok(data) => data,
        Err(e) => {
            warn!(tile = %coord, "Background fetch failed: {}", e);
            return;
        }
    };

    if let Err(e) = store.write(coord, data).await {
        warn!(tile = %coord, "Failed to write fetched tile to cache: {}", e);
    }
}

// =============================================================================
// Tests
// =============================================================================
