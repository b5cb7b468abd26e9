//! Key-value configuration store implementations.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::RwLock;

use crate::errors::{SyncError, SyncResult};

/// Host configuration store interface.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read a value.
    async fn get(&self, key: &str) -> SyncResult<Option<String>>;

    /// Write a single value.
    async fn set(&self, key: &str, value: &str) -> SyncResult<()>;

    /// Write several values as one unit; readers see either none or all of them.
    async fn set_many(&self, entries: &[(&str, &str)]) -> SyncResult<()>;
}

/// In-memory configuration store.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with values.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    fn lock(&self) -> SyncResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| SyncError::storage("configuration store lock poisoned"))
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> SyncResult<()> {
        let mut values = self.lock()?;
        for (key, value) in entries {
            values.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}

/// File-backed configuration store holding a flat JSON object.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so the file on disk always holds a complete snapshot.
#[derive(Debug)]
pub struct FileConfigStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileConfigStore {
    /// Open a store at `path`. A missing file is treated as an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> SyncResult<Self> {
        let path = path.into();
        let values = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> SyncResult<()> {
        let bytes = serde_json::to_vec_pretty(values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self, key: &str) -> SyncResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SyncResult<()> {
        self.set_many(&[(key, value)]).await
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> SyncResult<()> {
        let mut values = self.values.write().await;
        let mut updated = values.clone();
        for (key, value) in entries {
            updated.insert((*key).to_string(), (*value).to_string());
        }

        self.persist(&updated).await?;
        *values = updated;
        Ok(())
    }
}
