// Background snapshot writer - Moves blocking storage writes off the engine task
use crate::application::snapshot_storage::{SnapshotStorage, StorageError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a blocking storage. Reads go straight through (they only happen at
/// startup); writes are queued and performed one at a time on the blocking
/// pool, so `write` returns immediately.
pub struct BackgroundSnapshotStorage {
    inner: Arc<dyn SnapshotStorage>,
    writes: mpsc::UnboundedSender<String>,
}

impl BackgroundSnapshotStorage {
    /// The returned task ends once the storage is dropped and every queued
    /// write has been attempted.
    pub fn spawn(inner: Arc<dyn SnapshotStorage>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(inner.clone(), rx));
        (Self { inner, writes: tx }, task)
    }
}

async fn run_writer(inner: Arc<dyn SnapshotStorage>, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(mut contents) = rx.recv().await {
        // only the newest queued snapshot matters
        let mut skipped = 0;
        while let Ok(newer) = rx.try_recv() {
            contents = newer;
            skipped += 1;
        }
        if skipped > 0 {
            tracing::debug!("Coalesced {} queued snapshot writes", skipped);
        }

        let storage = inner.clone();
        match tokio::task::spawn_blocking(move || storage.write(&contents)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Could not persist dashboard snapshot: {}", e),
            Err(e) => tracing::error!("Snapshot writer panicked: {}", e),
        }
    }
}

impl SnapshotStorage for BackgroundSnapshotStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        self.inner.read()
    }

    fn write(&self, contents: &str) -> Result<(), StorageError> {
        self.writes
            .send(contents.to_string())
            .map_err(|_| StorageError::Unavailable("snapshot writer stopped".to_string()))
    }
}
