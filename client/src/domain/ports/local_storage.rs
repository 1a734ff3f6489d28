//! Driven port for persistent client-side key/value storage.
//!
//! Storage outlives the process the way browser local storage outlives a
//! tab: the access token and the last listing location are kept here so a
//! restart resumes where the user left off.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use super::define_port_error;

define_port_error! {
    /// Errors raised by local storage adapters.
    pub enum LocalStorageError {
        /// Reading or writing the backing store failed.
        Io { message: String } =>
            "local storage i/o failed: {message}",
        /// The backing store exists but cannot be parsed.
        Corrupt { message: String } =>
            "local storage is corrupt: {message}",
    }
}

/// Port for string key/value storage.
#[cfg_attr(test, mockall::automock)]
pub trait LocalStorage: Send + Sync {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), LocalStorageError>;
}

/// Process-local storage used by tests and `--ephemeral` sessions.
#[derive(Debug, Default)]
pub struct InMemoryLocalStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl InMemoryLocalStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `items`.
    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let items = items
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
        Self {
            items: Mutex::new(items),
        }
    }

    /// Keys currently stored, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl LocalStorage for InMemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStorageError> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), LocalStorageError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}
