//! Local key/value storage backends for the session store.
//!
//! Values are plain strings; the store decides their encoding. Keys are short
//! identifiers such as `cart` or `token`.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A synchronous string key/value store.
///
/// Reads take `&self`; writes take `&mut self` so the owner of the backend is
/// its only writer.
pub trait LocalStorage {
    /// Read the value under `key`, or `None` if it was never written or has
    /// been removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value could not be stored.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: LocalStorage + ?Sized> LocalStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage. Never fails; contents die with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `items`.
    #[must_use]
    pub fn with_items<K, V, I>(items: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            items: items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Directory-backed storage with one file per key.
///
/// Writes land in a uniquely named temporary file in the same directory that
/// is then renamed over the target, so a reader never sees a half-written
/// value. Temporary names start with `.` and can never collide with a key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// The backing directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let tmp_path = tmp.path().to_path_buf();
        tmp.write_all(value.as_bytes()).map_err(|source| StorageError::Io {
            path: tmp_path,
            source,
        })?;
        tmp.persist(&path).map_err(|e| StorageError::Io {
            path,
            source: e.error,
        })?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart").unwrap(), None);

        storage.set_item("cart", "[]").unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));

        storage.remove_item("cart").unwrap();
        assert_eq!(storage.get_item("cart").unwrap(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_with_items() {
        let storage = MemoryStorage::with_items([("token", "abc"), ("user", "null")]);
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("session")).unwrap();

        storage.set_item("token", "raw-token").unwrap();
        assert_eq!(
            storage.get_item("token").unwrap().as_deref(),
            Some("raw-token")
        );
        assert!(storage.dir().join("token").exists());

        storage.set_item("token", "rotated").unwrap();
        assert_eq!(
            storage.get_item("token").unwrap().as_deref(),
            Some("rotated")
        );

        storage.remove_item("token").unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut storage = FileStorage::open(dir.path()).unwrap();
            storage.set_item("cart", "[{\"id\":1}]").unwrap();
        }
        let storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(
            storage.get_item("cart").unwrap().as_deref(),
            Some("[{\"id\":1}]")
        );
    }

    #[test]
    fn test_file_storage_remove_absent_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert!(storage.remove_item("user").is_ok());
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", "dot.key"] {
            assert!(matches!(
                storage.set_item(key, "x"),
                Err(StorageError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set_item("cart", "[]").unwrap();
        storage.set_item("cart", "[{\"id\":2}]").unwrap();
        storage.set_item("token", "abc").unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["cart", "token"]);
    }

    #[test]
    fn test_file_storage_failed_write_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        // A directory in the way makes the final rename fail
        fs::create_dir(dir.path().join("cart")).unwrap();
        fs::write(dir.path().join("cart").join("keep"), "x").unwrap();

        assert!(matches!(
            storage.set_item("cart", "[]"),
            Err(StorageError::Io { .. })
        ));

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cart"]);
    }
}
