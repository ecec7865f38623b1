// Storage trait for the persisted dashboard snapshot
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single durable slot holding the serialized snapshot.
pub trait SnapshotStorage: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, StorageError>;

    fn write(&self, contents: &str) -> Result<(), StorageError>;
}
