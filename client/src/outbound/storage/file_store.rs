//! File-backed local storage kept in the per-user state directory.
//!
//! All keys live in one JSON object, `local-storage.json`. Every write
//! replaces the file atomically.

use std::collections::BTreeMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;
use zeroize::Zeroizing;

use super::atomic_io::write_atomic;
use crate::domain::ports::{LocalStorage, LocalStorageError};

/// File holding the key/value map inside the state directory.
pub const STORAGE_FILE: &str = "local-storage.json";

type Items = BTreeMap<String, String>;

/// [`LocalStorage`] adapter persisting to `<state_dir>/local-storage.json`.
pub struct FileLocalStorage {
    dir: Dir,
    root: Utf8PathBuf,
    write_lock: Mutex<()>,
}

impl FileLocalStorage {
    /// Open (creating if needed) the state directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStorageError::Io`] when the directory cannot be
    /// created or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, LocalStorageError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|err| LocalStorageError::io(format!("creating {root}: {err}")))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|err| LocalStorageError::io(format!("opening {root}: {err}")))?;
        Ok(Self {
            dir,
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    fn read_items(&self) -> Result<Items, LocalStorageError> {
        let raw = match self.dir.read_to_string(STORAGE_FILE) {
            Ok(raw) => Zeroizing::new(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Items::new()),
            Err(err) => {
                return Err(LocalStorageError::io(format!(
                    "reading {}: {err}",
                    self.root.join(STORAGE_FILE)
                )));
            }
        };
        if raw.trim().is_empty() {
            return Ok(Items::new());
        }
        serde_json::from_str(&raw).map_err(|err| {
            LocalStorageError::corrupt(format!("{}: {err}", self.root.join(STORAGE_FILE)))
        })
    }

    fn write_items(&self, items: &Items) -> Result<(), LocalStorageError> {
        let encoded = Zeroizing::new(
            serde_json::to_vec_pretty(items)
                .map_err(|err| LocalStorageError::io(err.to_string()))?,
        );
        write_atomic(&self.dir, Utf8Path::new(STORAGE_FILE), &encoded)
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStorageError> {
        let mut items = self.read_items()?;
        Ok(items.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_items()?;
        items.insert(key.to_owned(), value.to_owned());
        self.write_items(&items)?;
        debug!(key, "local storage item written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), LocalStorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.read_items()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.write_items(&items)?;
        debug!(key, "local storage item removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    struct Store {
        _temp: tempfile::TempDir,
        root: Utf8PathBuf,
        store: FileLocalStorage,
    }

    #[fixture]
    fn store() -> Store {
        let temp = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().join("state")).expect("utf-8 path");
        let store = FileLocalStorage::open(&root).expect("open store");
        Store {
            _temp: temp,
            root,
            store,
        }
    }

    #[rstest]
    fn values_survive_reopening(store: Store) {
        store.store.set_item("access_token", "tok").expect("set");
        store.store.set_item("refresh_token", "ref").expect("set");

        let reopened = FileLocalStorage::open(&store.root).expect("reopen");
        assert_eq!(
            reopened.get_item("access_token").expect("get").as_deref(),
            Some("tok")
        );
    }

    #[rstest]
    fn removing_keys_rewrites_the_file(store: Store) {
        store.store.set_item("access_token", "tok").expect("set");
        store.store.remove_item("access_token").expect("remove");
        store.store.remove_item("access_token").expect("second remove is a no-op");

        assert_eq!(store.store.get_item("access_token").expect("get"), None);
        let raw = std::fs::read_to_string(store.root.join(STORAGE_FILE)).expect("read file");
        assert!(!raw.contains("tok"));
    }

    #[rstest]
    fn missing_file_reads_as_empty(store: Store) {
        assert_eq!(store.store.get_item("anything").expect("get"), None);
    }

    #[rstest]
    fn corrupt_file_is_reported(store: Store) {
        std::fs::write(store.root.join(STORAGE_FILE), "not json").expect("seed");
        let err = store.store.get_item("access_token").expect_err("corrupt");
        assert!(matches!(err, LocalStorageError::Corrupt { .. }));
    }
}
