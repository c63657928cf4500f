//! Key-value slot storage: one JSON array per collection.

use super::{record_key, Collection, RecordStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// String storage addressed by named slots.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    async fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local slots; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.lock().await.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // write-then-rename so a crash never leaves a half-written slot
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// [`RecordStore`] over key-value slots. Each change rewrites the whole slot.
pub struct LocalStore<S: KeyValueStorage> {
    storage: S,
    // serializes read-modify-write cycles on the slots
    write_lock: Mutex<()>,
}

impl<S: KeyValueStorage> LocalStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn write_all(&self, collection: Collection, records: &[Value]) -> Result<(), StoreError> {
        let json = serde_json::to_string(records)?;
        debug!(key = collection.local_key(), records = records.len(), "Slot rewritten");
        self.storage.set_item(collection.local_key(), &json).await
    }
}

#[async_trait]
impl<S: KeyValueStorage> RecordStore for LocalStore<S> {
    async fn load(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        match self.storage.get_item(collection.local_key()).await? {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| StoreError::corrupt(collection.local_key(), e.to_string())),
        }
    }

    async fn put(&self, collection: Collection, key: &str, record: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load(collection).await?;
        match records
            .iter()
            .position(|r| record_key(collection, r).as_deref() == Some(key))
        {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        self.write_all(collection, &records).await
    }

    async fn remove(&self, collection: Collection, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load(collection).await?;
        let before = records.len();
        records.retain(|r| record_key(collection, r).as_deref() != Some(key));
        if records.len() == before {
            return Ok(());
        }
        self.write_all(collection, &records).await
    }
}
