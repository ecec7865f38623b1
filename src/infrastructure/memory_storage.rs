// In-memory snapshot storage - used when no snapshot path is configured
use crate::application::snapshot_storage::{SnapshotStorage, StorageError};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    contents: Mutex<Option<String>>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let contents = self
            .contents
            .lock()
            .map_err(|_| StorageError::Unavailable("snapshot lock poisoned".to_string()))?;
        Ok(contents.clone())
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        let mut slot = self
            .contents
            .lock()
            .map_err(|_| StorageError::Unavailable("snapshot lock poisoned".to_string()))?;
        *slot = Some(contents.to_string());
        Ok(())
    }
}
