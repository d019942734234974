use std::sync::Arc;

use quiz_core::model::{Domain, LevelCatalog, ProgressBook};
use storage::repository::{KeyValueStore, Storage, StorageError};
use storage::{ProgressRecord, ProgressRepository};

use crate::error::ProgressError;

/// Loads and saves a game's `ProgressBook`.
///
/// A stored record that cannot be read back is treated as missing: the
/// game starts over with default progress instead of failing.
#[derive(Clone)]
pub struct ProgressService {
    repo: ProgressRepository,
}

impl ProgressService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            repo: ProgressRepository::new(kv),
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(Arc::clone(&storage.kv))
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(&Storage::in_memory())
    }

    /// Load progress for `domain`, with the catalog's starter levels unlocked.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the backend cannot be read.
    /// Corrupt records are not errors.
    pub async fn load(
        &self,
        domain: Domain,
        catalog: &LevelCatalog,
    ) -> Result<ProgressBook, ProgressError> {
        let mut book = match self.repo.load(domain).await {
            Ok(Some(record)) => record.into_book(),
            Ok(None) => ProgressBook::new(),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(game = %domain, %reason, "stored progress is unreadable, starting fresh");
                ProgressBook::new()
            }
            Err(err) => return Err(err.into()),
        };
        book.unlock_starters(catalog);
        Ok(book)
    }

    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the write fails.
    pub async fn save(&self, domain: Domain, book: &ProgressBook) -> Result<(), ProgressError> {
        self.repo
            .save(domain, &ProgressRecord::from_book(book))
            .await?;
        Ok(())
    }

    /// Forget all progress for `domain`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the delete fails.
    pub async fn reset(&self, domain: Domain) -> Result<(), ProgressError> {
        self.repo.clear(domain).await?;
        tracing::info!(game = %domain, "progress reset");
        Ok(())
    }
}
