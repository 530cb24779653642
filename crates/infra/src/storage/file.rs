//! File-backed key-value storage
//!
//! All keys live in one JSON object on disk. Every write replaces the whole
//! file through a temporary file in the same directory followed by a rename,
//! so readers observe either the previous or the new contents.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use encore_common::auth::{KeyValueStorage, StorageError};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

type Entries = BTreeMap<String, String>;

/// Key-value storage persisted to a single JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (or lazily create) the store at `path`
    ///
    /// # Errors
    /// Returns error if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "opened file storage");
        Ok(Self { path, write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Entries::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to start a write from; a corrupted file is replaced
    fn entries_for_write(&self) -> Result<Entries, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupted(reason)) => {
                warn!(path = %self.path.display(), %reason, "replacing corrupted storage file");
                Ok(Entries::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, entries)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| StorageError::from(e.error))?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock();
        let mut entries = self.entries_for_write()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set("musicTokens", r#"{"accessToken":"A"}"#).unwrap();
        storage.set("musicVerifier", "V").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("musicVerifier").unwrap().as_deref(), Some("V"));
        assert_eq!(
            reopened.get("musicTokens").unwrap().as_deref(),
            Some(r#"{"accessToken":"A"}"#)
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();

        storage.remove("missing").unwrap();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();

        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn corrupted_file_reads_as_error_and_is_replaced_on_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(matches!(storage.get("k"), Err(StorageError::Corrupted(_))));

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }
}
