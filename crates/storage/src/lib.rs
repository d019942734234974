#![forbid(unsafe_code)]

pub mod progress_repo;
pub mod record;
pub mod repository;
pub mod sqlite;

pub use progress_repo::ProgressRepository;
pub use record::{LevelProgressRecord, ProgressRecord};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
