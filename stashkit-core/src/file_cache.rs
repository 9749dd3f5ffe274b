//! File-mode backend: one file per key plus an in-memory read-through map.
//!
//! The map is filled on every write and on every disk hit and is never
//! evicted. A write updates the map before touching disk, so a failed disk
//! write still reads back consistently within this context.
//!
//! Only the map itself is locked. Disk writes are unsynchronized: concurrent
//! writers of the same key may leave map and disk disagreeing on which write
//! was last.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::sync::{Arc, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::paths::{validate_key, CachePaths};

/// Per-key file store shadowed by an unbounded memory map.
#[derive(Debug)]
pub struct FileCache {
    paths: Arc<CachePaths>,
    memory: RwLock<HashMap<String, Vec<u8>>>,
}

impl FileCache {
    /// Creates a cache over `paths`. Nothing touches disk until first use.
    #[must_use]
    pub fn new(paths: Arc<CachePaths>) -> Self {
        Self {
            paths,
            memory: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cache location.
    #[must_use]
    pub fn paths(&self) -> &Arc<CachePaths> {
        &self.paths
    }

    /// Records `bytes` for `key` in memory, then writes them to disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] without caching anything if the key
    /// is not a file name. Disk failures are returned after the memory map
    /// has been updated.
    pub fn write(&self, key: &str, bytes: Vec<u8>) -> StoreResult<()> {
        validate_key(key)?;
        self.remember(key, bytes.clone());
        let path = self.paths.entry_path(key)?;
        fs::write(&path, &bytes)
            .map_err(|err| StoreError::FileCache(format!("{}: {err}", path.display())))
    }

    /// Returns the bytes for `key`, from memory if seen before, else from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid, or the file exists but cannot
    /// be read.
    pub fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        validate_key(key)?;
        if let Some(bytes) = self.cached(key) {
            return Ok(Some(bytes));
        }
        let path = self.paths.entry_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                self.remember(key, bytes.clone());
                Ok(Some(bytes))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::FileCache(format!("{}: {err}", path.display()))),
        }
    }

    /// Forgets `key` in memory and deletes its file.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or the file cannot be removed.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;
        if let Ok(mut memory) = self.memory.write() {
            memory.remove(key);
        }
        let path = self.paths.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::FileCache(format!("{}: {err}", path.display()))),
        }
    }

    /// Number of keys held in memory.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.memory.read().map_or(0, |memory| memory.len())
    }

    fn cached(&self, key: &str) -> Option<Vec<u8>> {
        self.memory.read().ok()?.get(key).cloned()
    }

    fn remember(&self, key: &str, bytes: Vec<u8>) {
        match self.memory.write() {
            Ok(mut memory) => {
                memory.insert(key.to_string(), bytes);
            }
            Err(_) => log::warn!("file cache map poisoned; {key} not cached"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(root: &tempfile::TempDir) -> FileCache {
        FileCache::new(Arc::new(CachePaths::with_root(root.path(), "app")))
    }

    #[test]
    fn write_lands_on_disk_and_in_memory() {
        let root = tempfile::tempdir().unwrap();
        let cache = cache(&root);

        cache.write("greeting", b"hi".to_vec()).unwrap();

        assert_eq!(fs::read(root.path().join("app/greeting")).unwrap(), b"hi");
        assert_eq!(cache.cached_len(), 1);
        assert_eq!(cache.read("greeting").unwrap(), Some(b"hi".to_vec()));
    }

    #[test]
    fn memory_shadows_disk() {
        let root = tempfile::tempdir().unwrap();
        let cache = cache(&root);
        cache.write("k", b"one".to_vec()).unwrap();

        fs::write(root.path().join("app/k"), b"garbage").unwrap();
        assert_eq!(cache.read("k").unwrap(), Some(b"one".to_vec()));

        fs::remove_file(root.path().join("app/k")).unwrap();
        assert_eq!(cache.read("k").unwrap(), Some(b"one".to_vec()));
    }

    #[test]
    fn disk_hits_are_remembered() {
        let root = tempfile::tempdir().unwrap();
        let first = cache(&root);
        first.write("k", b"v".to_vec()).unwrap();

        let second = cache(&root);
        assert_eq!(second.cached_len(), 0);
        assert_eq!(second.read("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(second.cached_len(), 1);
        assert_eq!(second.read("missing").unwrap(), None);
        assert_eq!(second.cached_len(), 1);
    }

    #[test]
    fn failed_disk_write_still_updates_memory() {
        let root = tempfile::tempdir().unwrap();
        let cache = cache(&root);
        // A directory where the entry file should go makes the write fail.
        fs::create_dir_all(root.path().join("app/blocked")).unwrap();

        assert!(matches!(
            cache.write("blocked", b"v".to_vec()),
            Err(StoreError::FileCache(_))
        ));
        assert_eq!(cache.read("blocked").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn invalid_key_is_not_cached() {
        let root = tempfile::tempdir().unwrap();
        let cache = cache(&root);
        assert!(matches!(
            cache.write("../escape", vec![1]),
            Err(StoreError::InvalidKey(_))
        ));
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn remove_forgets_memory_and_disk() {
        let root = tempfile::tempdir().unwrap();
        let cache = cache(&root);
        cache.write("k", vec![1]).unwrap();
        cache.remove("k").unwrap();
        cache.remove("never-written").unwrap();

        assert_eq!(cache.read("k").unwrap(), None);
        assert!(!root.path().join("app/k").exists());
    }
}
