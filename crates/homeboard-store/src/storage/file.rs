//! Directory-backed storage.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a unique temp file
//! in the same directory which is synced and then renamed over the target, so
//! a crash or a concurrent writer never leaves a half-written value behind.
//! Two writers racing on one key resolve as last-write-wins.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::KeyValueStorage;
use crate::error::{Result, StorageError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::Io {
            operation: "create directory",
            path: dir.clone(),
            source: e,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{key}.{}.{n}.tmp", std::process::id()))
    }
}

/// Keys become file names, so only a conservative alphabet is accepted.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io {
                operation: "read",
                path,
                source: e,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = self.temp_path_for(key);

        let write_temp = || -> std::result::Result<(), (&'static str, std::io::Error)> {
            let mut file = File::create(&temp_path).map_err(|e| ("create", e))?;
            file.write_all(value.as_bytes()).map_err(|e| ("write", e))?;
            file.sync_all().map_err(|e| ("sync", e))?;
            Ok(())
        };

        if let Err((operation, source)) = write_temp() {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::Io {
                operation,
                path: temp_path,
                source,
            });
        }

        // Atomic rename
        if let Err(source) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(StorageError::AtomicWriteFailed {
                key: key.to_string(),
                temp_path,
                target_path: path,
                source,
            });
        }

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "wrote storage key");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io {
                operation: "remove",
                path,
                source: e,
            }),
        }
    }
}
