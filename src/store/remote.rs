//! Document-database adapter.

use super::{Collection, RecordStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

/// A failed database call, as reported by the database client.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DatabaseError(pub String);

/// A document-per-record database (collections of JSON documents keyed by id).
#[async_trait]
pub trait DocumentDatabase: Send + Sync {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>, DatabaseError>;
    async fn set_document(&self, collection: &str, id: &str, document: Value) -> Result<(), DatabaseError>;
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DatabaseError>;
}

#[derive(Debug, Default)]
struct Faults {
    offline: bool,
    failing_writes: HashMap<String, usize>,
}

/// In-process document database with failure injection.
#[derive(Debug, Default)]
pub struct MemoryDocumentDb {
    collections: Mutex<HashMap<String, Vec<(String, Value)>>>,
    faults: Mutex<Faults>,
}

impl MemoryDocumentDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails.
    pub async fn set_offline(&self, offline: bool) {
        self.faults.lock().await.offline = offline;
    }

    /// The next `count` writes (set or delete) to `collection` fail.
    pub async fn fail_next_writes(&self, collection: &str, count: usize) {
        self.faults
            .lock()
            .await
            .failing_writes
            .insert(collection.to_string(), count);
    }

    pub async fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .lock()
            .await
            .get(collection)?
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, doc)| doc.clone())
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    async fn check(&self, collection: &str, write: bool) -> Result<(), DatabaseError> {
        let mut faults = self.faults.lock().await;
        if faults.offline {
            return Err(DatabaseError("database unavailable".into()));
        }
        if write {
            if let Some(remaining) = faults.failing_writes.get_mut(collection) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(DatabaseError(format!("write to {} rejected", collection)));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentDatabase for MemoryDocumentDb {
    async fn list_documents(&self, collection: &str) -> Result<Vec<Value>, DatabaseError> {
        self.check(collection, false).await?;
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn set_document(&self, collection: &str, id: &str, document: Value) -> Result<(), DatabaseError> {
        self.check(collection, true).await?;
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(key, _)| key == id) {
            Some((_, existing)) => *existing = document,
            None => docs.push((id.to_string(), document)),
        }
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), DatabaseError> {
        self.check(collection, true).await?;
        if let Some(docs) = self.collections.lock().await.get_mut(collection) {
            docs.retain(|(key, _)| key != id);
        }
        Ok(())
    }
}

/// [`RecordStore`] over a [`DocumentDatabase`]. Every failure is reported as
/// [`StoreError::RemoteOperationFailed`]; nothing is retried.
pub struct RemoteStore<D: DocumentDatabase> {
    db: Arc<D>,
}

impl<D: DocumentDatabase> RemoteStore<D> {
    pub fn new(db: Arc<D>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<D> {
        &self.db
    }
}

fn remote_failure(operation: &'static str, collection: Collection, e: DatabaseError) -> StoreError {
    warn!(operation, %collection, error = %e, "Remote operation failed");
    StoreError::RemoteOperationFailed {
        operation,
        collection: collection.remote_name().to_string(),
        reason: e.0,
    }
}

#[async_trait]
impl<D: DocumentDatabase> RecordStore for RemoteStore<D> {
    async fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        self.db
            .list_documents(collection.remote_name())
            .await
            .map_err(|e| remote_failure("read", collection, e))
    }

    async fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError> {
        self.db
            .set_document(collection.remote_name(), key, record)
            .await
            .map_err(|e| remote_failure("write", collection, e))
    }

    async fn remove(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        self.db
            .delete_document(collection.remote_name(), key)
            .await
            .map_err(|e| remote_failure("delete", collection, e))
    }
}
