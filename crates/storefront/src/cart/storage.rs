//! Persistence adapters for the cart snapshot.
//!
//! A `CartStorage` is a single durable slot holding one serialized cart. The
//! adapters know nothing about line items; encoding lives in
//! [`super::snapshot`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Fixed key the cart snapshot is stored under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors reading or writing a cart slot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("storage slot lock poisoned")]
    Poisoned,
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A durable key-value slot holding one serialized cart.
///
/// Implementations must be synchronous: a `write` has completed by the time
/// it returns, so consecutive writes land in call order.
pub trait CartStorage: Send + Sync {
    /// Read the stored snapshot, `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written.
    fn write(&self, snapshot: &str) -> Result<(), StorageError>;

    /// Delete the stored snapshot. Deleting an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing snapshot could not be removed.
    fn discard(&self) -> Result<(), StorageError>;
}

/// In-process slot. Contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot.into())),
        }
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let slot = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(slot.clone())
    }

    fn write(&self, snapshot: &str) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        *slot = Some(snapshot.to_owned());
        Ok(())
    }

    fn discard(&self) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().map_err(|_| StorageError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// File-backed slot at `<dir>/cart.json`.
///
/// Writes go to a sibling temp file that is then renamed over the slot, so a
/// reader never observes a partially written snapshot.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Slot for the fixed cart key inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::at(dir.as_ref().join(format!("{CART_STORAGE_KEY}.json")))
    }

    /// Slot at an explicit file path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the slot on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    fn write(&self, snapshot: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp).map_err(|e| StorageError::io(&temp, e))?;
        file.write_all(snapshot.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| StorageError::io(&temp, e))?;

        fs::rename(&temp, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }

    fn discard(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }
}
