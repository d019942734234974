use std::sync::Arc;

use quiz_core::model::Domain;

use crate::record::{PROGRESS_RECORD_VERSION, ProgressRecord, progress_key};
use crate::repository::{KeyValueStore, StorageError};

/// Typed access to the per-game progress record.
#[derive(Clone)]
pub struct ProgressRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl ProgressRepository {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the stored record for `domain`.
    ///
    /// Returns `Ok(None)` on first run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value does not
    /// parse or carries an unknown version, and other storage errors from the
    /// backend.
    pub async fn load(&self, domain: Domain) -> Result<Option<ProgressRecord>, StorageError> {
        let Some(raw) = self.kv.get(&progress_key(domain)).await? else {
            return Ok(None);
        };
        let record: ProgressRecord =
            serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        if record.version != PROGRESS_RECORD_VERSION {
            return Err(StorageError::Serialization(format!(
                "unsupported progress version {}",
                record.version
            )));
        }
        Ok(Some(record))
    }

    /// Replace the stored record for `domain`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save(&self, domain: Domain, record: &ProgressRecord) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(&progress_key(domain), &raw).await?;
        tracing::debug!(game = %domain, bytes = raw.len(), "progress saved");
        Ok(())
    }

    /// Delete the stored record for `domain`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear(&self, domain: Domain) -> Result<(), StorageError> {
        self.kv.remove(&progress_key(domain)).await
    }
}
