//! Link collection persistence
//!
//! The store talks to its backing storage through [`LinkPersistence`], a
//! single slot of UTF-8 text that is always read and written whole.
//!
//! Backends:
//! - [`FilePersistence`] - one JSON file, written atomically
//! - [`MemoryPersistence`] - in-process slot for tests and ephemeral use

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::error::{StorageError, StorageResult};
use crate::config::Config;

/// Read-all / write-all port for the persisted collection
pub trait LinkPersistence {
    /// Read the stored text
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    fn read_all(&self) -> StorageResult<Option<String>>;

    /// Replace the stored text
    fn write_all(&self, data: &str) -> StorageResult<()>;
}

/// File-backed persistence
///
/// Writes go to a temporary file first and are renamed into place, so the
/// target file is never left partially written.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Persist to the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist to the link file inside the configured data directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.links_path())
    }
}

impl LinkPersistence for FilePersistence {
    fn read_all(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(StorageError::PermissionDenied {
                    path: self.path.clone(),
                    source: e,
                })
            }
            Err(e) => Err(StorageError::ReadError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write_all(&self, data: &str) -> StorageResult<()> {
        atomic_write(&self.path, data.as_bytes())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError::from_io(e, parent.to_path_buf()))?;
        }
    }

    // Temp file lives next to the target so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// In-memory persistence
///
/// Clones share the same slot, so a caller can keep a handle to inspect
/// what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryPersistence {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with `data`
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(data.into()))),
        }
    }

    /// Current contents of the slot
    pub fn contents(&self) -> Option<String> {
        self.slot
            .read()
            .map(|slot| slot.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}

impl LinkPersistence for MemoryPersistence {
    fn read_all(&self) -> StorageResult<Option<String>> {
        let slot = self
            .slot
            .read()
            .map_err(|e| StorageError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(slot.clone())
    }

    fn write_all(&self, data: &str) -> StorageResult<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| StorageError::Unavailable(format!("lock poisoned: {e}")))?;
        *slot = Some(data.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_read_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("links.json");
        let persistence = FilePersistence::new(&path);

        assert!(!path.exists());
        assert!(persistence.read_all().unwrap().is_none());
    }

    #[test]
    fn test_file_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("links.json");
        let persistence = FilePersistence::new(&path);

        persistence.write_all("[]").unwrap();
        assert!(path.exists());
        assert_eq!(persistence.read_all().unwrap().as_deref(), Some("[]"));

        // Full overwrite, not append
        persistence.write_all(r#"{"version":1,"links":[]}"#).unwrap();
        assert_eq!(
            persistence.read_all().unwrap().as_deref(),
            Some(r#"{"version":1,"links":[]}"#)
        );
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("links.json");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        assert!(!nested_path.with_extension("tmp").exists());
        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "test data");
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let persistence = FilePersistence::new(blocker.join("links.json"));
        assert!(persistence.write_all("[]").is_err());
    }

    #[test]
    fn test_memory_clones_share_slot() {
        let persistence = MemoryPersistence::new();
        let handle = persistence.clone();

        assert!(persistence.read_all().unwrap().is_none());
        persistence.write_all("[]").unwrap();
        assert_eq!(handle.contents().as_deref(), Some("[]"));

        let prefilled = MemoryPersistence::with_data("{}");
        assert_eq!(prefilled.read_all().unwrap().as_deref(), Some("{}"));
    }
}
