//! Local storage adapters backed by the filesystem.

mod atomic_io;
mod file_store;

pub use file_store::{FileLocalStorage, STORAGE_FILE};
