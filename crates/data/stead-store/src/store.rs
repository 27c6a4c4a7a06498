//! The gateway trait and the cache-invalidation signal.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use stead_core::{CollectionPage, Document, GatewayResult};

use crate::query::QueryOptions;

/// Document store gateway. The UI layer only ever talks to this trait;
/// the serialization contract (ISO-8601 timestamps, plain JSON) is owned
/// here, not by callers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document. Stamps `createdAt`, persists, signals the
    /// display path for re-render.
    async fn add(&self, collection: &str, data: Value, path: &str) -> GatewayResult<Document>;

    /// Read one document. A missing id is `Ok(None)`, not an error.
    async fn get(&self, collection: &str, id: &str) -> GatewayResult<Option<Document>>;

    /// Read many documents through the filter DSL.
    async fn query(&self, collection: &str, options: QueryOptions) -> GatewayResult<CollectionPage>;

    /// Merge fields into an existing document and stamp `updatedAt`.
    /// No existence pre-check: a missing id is a silent no-op.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
        path: &str,
    ) -> GatewayResult<Document>;

    /// Delete a document. Verifies existence first and fails with
    /// `"Document does not exist"` when absent.
    async fn delete(&self, collection: &str, id: &str, path: &str) -> GatewayResult<()>;
}

/// Broadcast channel carrying display paths whose cached render is stale.
/// Writers fire it after every mutation; the web layer may subscribe.
#[derive(Debug, Clone)]
pub struct Invalidations {
    tx: broadcast::Sender<String>,
}

impl Invalidations {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn signal(&self, path: &str) {
        tracing::debug!(path, "invalidate display path");
        let _ = self.tx.send(path.to_string());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for Invalidations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalidation_signal_reaches_subscriber() {
        let invalidations = Invalidations::new();
        let mut rx = invalidations.subscribe();
        invalidations.signal("/property");
        assert_eq!(rx.recv().await.unwrap(), "/property");
    }

    #[test]
    fn test_signal_without_subscribers_does_not_fail() {
        Invalidations::new().signal("/dashboard");
    }
}
