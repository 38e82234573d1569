//! Single-slot telemetry sink.
//!
//! A collaborator service unrelated to the tile proxy: clients POST
//! arbitrary JSON payloads and the most recent one can be read back. There
//! is exactly one overwritable slot and no history; a new payload replaces
//! the previous one unconditionally.

use serde_json::Value;
use tokio::sync::RwLock;

/// Holds the most recently received telemetry document.
#[derive(Debug, Default)]
pub struct TelemetrySink {
    snapshot: RwLock<Option<Value>>,
}

impl TelemetrySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload, replacing any previous snapshot.
    pub async fn store(&self, payload: Value) {
        *self.snapshot.write().await = Some(payload);
    }

    /// The last stored payload, or `None` if nothing was ever received.
    pub async fn last(&self) -> Option<Value> {
        self.snapshot.read().await.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
