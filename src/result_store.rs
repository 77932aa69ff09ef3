// src/result_store.rs

use crate::storage::{KeyValueStore, StorageError};
use crate::types::UploadResult;
use std::sync::Arc;

const VIDEO_DATA_KEY: &str = "videoData";

/// Persists the `{title, id}` pairs from the last batch for later reuse
/// (display, external autofill). Pure persistence, append-only ordering.
#[derive(Clone)]
pub struct ResultStore {
    store: Arc<dyn KeyValueStore>,
}

impl ResultStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn get_all(&self) -> Result<Vec<UploadResult>, StorageError> {
        match self.store.get(VIDEO_DATA_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                key: VIDEO_DATA_KEY.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    pub async fn replace(&self, results: &[UploadResult]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(results).map_err(|e| StorageError::Corrupt {
            key: VIDEO_DATA_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(VIDEO_DATA_KEY, raw).await
    }

    pub async fn append(&self, results: &[UploadResult]) -> Result<(), StorageError> {
        let mut all = self.get_all().await?;
        all.extend_from_slice(results);
        self.replace(&all).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(VIDEO_DATA_KEY).await
    }
}
