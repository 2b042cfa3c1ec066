//! Snapshot persistence over the object store

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::interfaces::ObjectStore;
use crate::shared::errors::{MonitorError, StoreError};
use crate::shared::types::Snapshot;

/// Loads and saves snapshots in one bucket
pub struct SnapshotStore {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Previous snapshot for `key`, or `None` on the first observation
    pub async fn load(&self, key: &str) -> Result<Option<Snapshot>, MonitorError> {
        let body = match self.store.get_object(&self.bucket, key).await {
            Ok(body) => body,
            Err(StoreError::NotFound(detail)) => {
                warn!("{}", detail);
                info!("These are probably new coordinates");
                return Ok(None);
            }
            Err(StoreError::Retrieval(detail)) => {
                return Err(MonitorError::StoreRetrieval(detail));
            }
        };

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| MonitorError::StoreRetrieval(format!("Undecodable snapshot {}: {}", key, e)))
    }

    /// Overwrite the snapshot for `key`
    pub async fn save(&self, key: &str, snapshot: &Snapshot) -> Result<(), MonitorError> {
        let body = serde_json::to_vec(snapshot)
            .map_err(|e| MonitorError::StoreWrite(e.to_string()))?;

        self.store
            .put_object(&self.bucket, key, body)
            .await
            .map_err(|e| MonitorError::StoreWrite(e.to_string()))
    }
}
