//! This module provides local key-value stores, that keep data on this device

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::BoxError;
use crate::traits::LocalStore;


/// A local store that keeps every key in its own file, inside a folder
#[derive(Debug, Clone, PartialEq)]
pub struct FileStore {
    backing_folder: PathBuf,
}

impl FileStore {
    /// Get the default folder of the local store: `$HOME/.config/timeline-keeper`, or `./timeline-keeper-data` when `HOME` is not set
    pub fn default_folder() -> PathBuf {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        Self::default_folder_in(home.as_deref())
    }

    fn default_folder_in(home: Option<&Path>) -> PathBuf {
        match home {
            Some(home) if home.as_os_str().is_empty() == false => home.join(".config").join("timeline-keeper"),
            _ => {
                log::warn!("HOME is not set, the local store will live in the current folder");
                PathBuf::from("timeline-keeper-data")
            },
        }
    }

    /// Create a store in a given folder. The folder is created on the first write
    pub fn new(folder: &Path) -> Self {
        Self {
            backing_folder: PathBuf::from(folder),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.backing_folder
    }

    /// The file that holds a given key
    fn file_for(&self, key: &str) -> PathBuf {
        let file_name = sanitize_filename::sanitize(key);
        self.backing_folder.join(file_name + ".json")
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        let path = self.file_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No file {:?} yet", path);
                Ok(None)
            },
            Err(err) => Err(format!("Unable to read file {:?}: {}", path, err).into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BoxError> {
        if let Err(err) = std::fs::create_dir_all(&self.backing_folder) {
            return Err(format!("Unable to create folder {:?}: {}", self.backing_folder, err).into());
        }
        let path = self.file_for(key);
        if let Err(err) = std::fs::write(&path, value) {
            return Err(format!("Unable to save file {:?}: {}", path, err).into());
        }
        log::debug!("Saved {} bytes into {:?}", value.len(), path);
        Ok(())
    }
}



/// A local store that lives in memory.
///
/// Clones share the same content, so that a handle can be kept to inspect a store that has been given away
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns what is stored under a key, bypassing the `LocalStore` trait
    pub fn peek(&self, key: &str) -> Option<String> {
        self.data.lock().ok()
            .and_then(|data| data.get(key).cloned())
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BoxError> {
        let data = self.data.lock().map_err(|_| "memory store is poisoned")?;
        Ok(data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BoxError> {
        let mut data = self.data.lock().map_err(|_| "memory store is poisoned")?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn temp_folder() -> PathBuf {
        let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
        std::env::temp_dir().join(format!("timeline-keeper-test-{}", random))
    }

    #[test]
    fn file_store_roundtrip() {
        let folder = temp_folder();
        let mut store = FileStore::new(&folder);

        assert_eq!(store.get("timeline-events").unwrap(), None);
        store.set("timeline-events", "[1, 2]").unwrap();
        assert_eq!(store.get("timeline-events").unwrap(), Some("[1, 2]".to_string()));

        // Another instance on the same folder sees the same data
        let other = FileStore::new(&folder);
        assert_eq!(other.get("timeline-events").unwrap(), Some("[1, 2]".to_string()));

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[test]
    fn file_store_keys_are_sanitized() {
        let folder = temp_folder();
        let mut store = FileStore::new(&folder);

        store.set("../escape/attempt", "x").unwrap();
        assert_eq!(store.get("../escape/attempt").unwrap(), Some("x".to_string()));
        assert!(store.file_for("../escape/attempt").starts_with(&folder));

        let _ = std::fs::remove_dir_all(&folder);
    }

    #[test]
    fn default_folder_is_below_home() {
        let folder = FileStore::default_folder_in(Some(Path::new("/home/someone")));
        assert_eq!(folder, PathBuf::from("/home/someone/.config/timeline-keeper"));

        assert_eq!(FileStore::default_folder_in(None), PathBuf::from("timeline-keeper-data"));
        assert_eq!(FileStore::default_folder_in(Some(Path::new(""))), PathBuf::from("timeline-keeper-data"));

        if let Some(home) = std::env::var_os("HOME") {
            if Path::new(&home).is_absolute() {
                assert!(FileStore::default_folder().is_absolute());
            }
        }
    }

    #[test]
    fn memory_store_clones_share_data() {
        let mut store = MemoryStore::new();
        let handle = store.clone();

        store.set("key", "value").unwrap();
        assert_eq!(handle.peek("key"), Some("value".to_string()));
        assert_eq!(handle.get("other").unwrap(), None);
    }
}
