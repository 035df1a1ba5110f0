//! Durable key/value storage for serialized records.
//!
//! Each key maps to one text value. `FileStorage` keeps every key in its own
//! `<key>.json` file under a data directory; writes go through a temp file and a
//! rename so a crash never leaves a half-written record behind.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Result, TopicError};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
pub trait LocalStorage: Send + Sync {
    /// Returns `None` when nothing is stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// File-per-key storage rooted at a data directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TopicError::storage(key, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| TopicError::storage(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, &path)
        };
        write().map_err(|e| {
            let _ = fs::remove_file(&tmp);
            TopicError::storage(key, e)
        })?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TopicError::storage(key, e)),
        }
    }
}

/// Process-local storage; contents vanish with the value
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| TopicError::Internal("memory storage lock poisoned".to_string()))
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("k").expect("get"), None);
        storage.set_item("k", "{\"a\":1}").expect("set");
        assert_eq!(storage.get_item("k").expect("get").as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("nested").join("k.json").exists());
        assert!(!dir.path().join("nested").join("k.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_overwrite_and_remove() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path());

        storage.set_item("k", "one").expect("set");
        storage.set_item("k", "two").expect("overwrite");
        assert_eq!(storage.get_item("k").expect("get").as_deref(), Some("two"));

        storage.remove_item("k").expect("remove");
        assert_eq!(storage.get_item("k").expect("get"), None);
        storage.remove_item("k").expect("removing a missing key is fine");
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = MemoryStorage::new();
        storage.set_item("a", "1").expect("set a");
        storage.set_item("b", "2").expect("set b");
        storage.remove_item("a").expect("remove a");
        assert_eq!(storage.get_item("a").expect("get a"), None);
        assert_eq!(storage.get_item("b").expect("get b").as_deref(), Some("2"));
    }
}
