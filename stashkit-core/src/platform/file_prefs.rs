//! Preferences table persisted as a single JSON document.
//!
//! Writes land in memory; [`PreferencesStore::synchronize`] publishes the
//! whole table with write-to-temp, fsync, rename, fsync of the parent
//! directory, so readers see either the old or the new document.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{StoreError, StoreResult};

use super::PreferencesStore;

/// Durable preferences table for native targets.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    table: Mutex<Table>,
}

#[derive(Debug, Default)]
struct Table {
    entries: BTreeMap<String, Vec<u8>>,
    dirty: bool,
}

impl FilePreferences {
    /// Opens the table stored at `path`, starting empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(StoreError::Preferences(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
        };
        Ok(Self {
            path,
            table: Mutex::new(Table {
                entries,
                dirty: false,
            }),
        })
    }

    /// Returns the path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn table(&self) -> StoreResult<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| StoreError::Preferences("mutex poisoned".to_string()))
    }

    fn write_atomic(&self, bytes: &[u8]) -> StoreResult<()> {
        let io_err = |what: &str, err: std::io::Error| {
            StoreError::Preferences(format!("{what} {}: {err}", self.path.display()))
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| io_err("failed to create parent of", err))?;
        }
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        let temp = PathBuf::from(temp);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)
            .map_err(|err| io_err("failed to create temporary file for", err))?;
        file.write_all(bytes)
            .map_err(|err| io_err("failed to write temporary file for", err))?;
        file.sync_all()
            .map_err(|err| io_err("failed to sync temporary file for", err))?;
        fs::rename(&temp, &self.path).map_err(|err| io_err("failed to publish", err))?;
        self.sync_parent()
    }

    /// Syncs the parent directory so the rename itself is durable.
    #[cfg(unix)]
    fn sync_parent(&self) -> StoreResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        File::open(parent)
            .and_then(|dir| dir.sync_all())
            .map_err(|err| {
                StoreError::Preferences(format!("failed to sync {}: {err}", parent.display()))
            })
    }

    // Directories cannot be opened for syncing here; the rename is still
    // atomic on common file systems.
    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn sync_parent(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl PreferencesStore for FilePreferences {
    fn get(&self, key: String) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.table()?.entries.get(&key).cloned())
    }

    fn set(&self, key: String, value: Vec<u8>) -> StoreResult<()> {
        let mut table = self.table()?;
        table.entries.insert(key, value);
        table.dirty = true;
        Ok(())
    }

    fn remove(&self, key: String) -> StoreResult<()> {
        let mut table = self.table()?;
        if table.entries.remove(&key).is_some() {
            table.dirty = true;
        }
        Ok(())
    }

    fn synchronize(&self) -> StoreResult<()> {
        let mut table = self.table()?;
        if !table.dirty {
            return Ok(());
        }
        let bytes = serde_json::to_vec(&table.entries)?;
        self.write_atomic(&bytes)?;
        table.dirty = false;
        Ok(())
    }
}
