//! # storage-adapters
//!
//! File-backed implementation of the `CollectionStore` port: one
//! pretty-printed JSON array per collection under a data directory, loaded
//! and rewritten wholesale per mutation.
//!
//! Every mutation runs under a per-collection writer lock for the full
//! load → mutate → persist cycle, and replacement is write-temp-then-rename,
//! so readers never observe a half-written document and writers never lose
//! each other's updates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use domains::{ApplyFn, CollectionStore, DomainError, DomainResult, Snapshot};
use tokio::sync::Mutex;
use tracing::warn;

/// Whole-document JSON store rooted at a data directory.
///
/// Collection `foo` lives at `<data_dir>/foo.json` and is auto-created as an
/// empty array on first access.
pub struct JsonFileStore {
    data_dir: PathBuf,
    locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: std::sync::Mutex::new(HashMap::new()),
        }
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    /// One writer lock per collection, created lazily.
    fn writer_lock(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("collection lock registry poisoned");
        locks.entry(collection.to_string()).or_default().clone()
    }

    /// Loads a snapshot, creating the file if missing. Unreadable or corrupt
    /// documents degrade to an empty snapshot with a logged warning rather
    /// than failing the request.
    async fn load(&self, collection: &str) -> Snapshot {
        let path = self.collection_path(collection);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if let Err(err) = self.persist_at(&path, &Vec::new()).await {
                    warn!(collection, %err, "failed to create missing collection file");
                }
                return Vec::new();
            }
            Err(err) => {
                warn!(collection, %err, "error reading collection, degrading to empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(collection, %err, "corrupt collection document, degrading to empty");
                Vec::new()
            }
        }
    }

    /// Atomic whole-document replace: write to a sibling temp file, then
    /// rename over the live one.
    async fn persist_at(&self, path: &Path, snapshot: &Snapshot) -> DomainResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| DomainError::Storage(err.to_string()))?;
        }
        let body = serde_json::to_string_pretty(snapshot)
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CollectionStore for JsonFileStore {
    async fn read(&self, collection: &str) -> DomainResult<Snapshot> {
        let lock = self.writer_lock(collection);
        let _guard = lock.lock().await;
        Ok(self.load(collection).await)
    }

    async fn apply(&self, collection: &str, op: ApplyFn) -> DomainResult<Snapshot> {
        let lock = self.writer_lock(collection);
        let _guard = lock.lock().await;
        let snapshot = self.load(collection).await;
        let next = op(snapshot)?;
        self.persist_at(&self.collection_path(collection), &next).await?;
        Ok(next)
    }
}
