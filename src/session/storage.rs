// src/session/storage.rs
// Client-local key/value storage

use fs2::FileExt;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ChatError, ChatResult};

/// Durable string storage scoped to one client profile
pub trait LocalStorage: Send + Sync {
    fn get(&self, key: &str) -> ChatResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ChatResult<()>;
    fn remove(&self, key: &str) -> ChatResult<()>;
}

/// JSON object on disk. Writers hold an exclusive lock on `<file>.lock` and
/// replace the file atomically.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> ChatResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            ChatError::Storage(format!("{} is not a JSON object: {}", self.path.display(), e))
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> ChatResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(serde_json::to_string_pretty(map)?.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .map_err(|e| ChatError::Storage(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }

    /// Run a read-modify-write under the storage lock
    fn update<F>(&self, f: F) -> ChatResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let lock_path = self.path.with_extension("json.lock");
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        lock.lock_exclusive()?;

        let result = self.read_map().and_then(|mut map| {
            f(&mut map);
            self.write_map(&map)
        });

        let _ = lock.unlock();
        result
    }
}

impl LocalStorage for FileStorage {
    fn get(&self, key: &str) -> ChatResult<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ChatResult<()> {
        debug!(path = %self.path.display(), key, "Writing local storage");
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> ChatResult<()> {
        self.update(|map| {
            map.remove(key);
        })
    }
}

/// Process-lifetime storage, for tests and `--ephemeral` runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> ChatResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ChatResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ChatResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
