//! File-backed key/value storage.
//!
//! All slots live in one JSON object on disk. Every write rewrites the whole
//! file through a temporary sibling and a rename, so a crash leaves either
//! the old or the new contents.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use storefront_core::environment::{KeyValueStorage, StorageError};

/// Durable slots in a JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    slots: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open `path`, starting empty if the file does not exist yet
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the file cannot be read and
    /// [`StorageError::Corrupted`] if it is not a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let slots = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageError::Corrupted(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::Unavailable(format!("{}: {e}", path.display()))),
        };

        tracing::debug!(path = %path.display(), slots = slots.len(), "opened file storage");
        Ok(Self {
            path,
            slots: Mutex::new(slots),
        })
    }

    /// The backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn slots(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(slots)
            .map_err(|e| StorageError::Corrupted(e.to_string()))?;
        let unavailable = |e: io::Error| StorageError::Unavailable(format!("{}: {e}", self.path.display()));

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(unavailable)?;
        fs::rename(&tmp, &self.path).map_err(unavailable)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots();
        let previous = slots.insert(key.to_string(), value.to_string());
        if let Err(error) = self.flush(&slots) {
            match previous {
                Some(previous) => slots.insert(key.to_string(), previous),
                None => slots.remove(key),
            };
            return Err(error);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots();
        let Some(previous) = slots.remove(key) else {
            return Ok(());
        };
        if let Err(error) = self.flush(&slots) {
            slots.insert(key.to_string(), previous);
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn scratch_file() -> PathBuf {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        std::env::temp_dir().join(format!(
            "storefront-storage-{}-{}.json",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::SeqCst)
        ))
    }

    #[test]
    fn slots_survive_reopen() {
        let path = scratch_file();
        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set("cart", r#"{"items":[],"total":0}"#).unwrap();
            storage.set("theme", "dark").unwrap();
            storage.remove("theme").unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some(r#"{"items":[],"total":0}"#));
        assert_eq!(reopened.get("theme").unwrap(), None);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_starts_empty() {
        let storage = FileStorage::open(scratch_file()).unwrap();
        assert_eq!(storage.get("cart").unwrap(), None);
    }

    #[test]
    fn corrupted_file_is_reported() {
        let path = scratch_file();
        fs::write(&path, "not json").unwrap();

        assert!(matches!(FileStorage::open(&path), Err(StorageError::Corrupted(_))));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn failed_write_rolls_back_slot() {
        let dir = std::env::temp_dir().join(format!("storefront-missing-{}", std::process::id()));
        let storage = FileStorage::open(dir.join("nested").join("data.json")).unwrap();

        assert!(storage.set("theme", "dark").is_err());
        assert_eq!(storage.get("theme").unwrap(), None);
    }
}
