//! Key-value snapshot stores for the catalog.
//!
//! A store holds opaque string values under string keys. The catalog writes
//! one JSON document per key and reads it back on startup; nothing here knows
//! about the shape of those documents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use libris_kernel::settings::{StorageBackend, StorageSettings};

/// Synchronous key-value store used for catalog snapshots.
pub trait SnapshotStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when the key was never written.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Open the store selected by the storage settings.
pub fn open(settings: &StorageSettings) -> anyhow::Result<Arc<dyn SnapshotStore>> {
    match settings.backend {
        StorageBackend::Memory => {
            tracing::info!(target: "libris-db", "using in-memory snapshot store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::File => {
            let store = FileStore::open(&settings.data_dir)?;
            tracing::info!(
                target: "libris-db",
                data_dir = %settings.data_dir.display(),
                "using file snapshot store"
            );
            Ok(Arc::new(store))
        }
    }
}

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store writing one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory.
    pub fn open(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("failed to create data directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(anyhow!("invalid snapshot key '{}'", key));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        tracing::debug!(target: "libris-db", key, bytes = value.len(), "snapshot written");
        Ok(())
    }
}
