//! In-memory implementations of platform traits.
//!
//! Not durable and not secure. Used by the test suites and by hosts that
//! want a scratch store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock};

use crate::error::{StoreError, StoreResult};

use super::{Accessibility, PreferencesStore, SecureVault};

// =============================================================================
// Memory Preferences
// =============================================================================

/// In-memory preferences table backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, Vec<u8>>>,
    syncs: AtomicUsize,
}

impl MemoryPreferences {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `synchronize` calls observed.
    #[must_use]
    pub fn sync_count(&self) -> usize {
        self.syncs.load(Ordering::SeqCst)
    }

    /// Returns the number of stored values.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().unwrap().len()
    }

    /// Returns `true` if nothing is stored.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().unwrap().is_empty()
    }
}

impl PreferencesStore for MemoryPreferences {
    fn get(&self, key: String) -> StoreResult<Option<Vec<u8>>> {
        let values = self
            .values
            .read()
            .map_err(|_| StoreError::Preferences("lock poisoned".to_string()))?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: String, value: Vec<u8>) -> StoreResult<()> {
        self.values
            .write()
            .map_err(|_| StoreError::Preferences("lock poisoned".to_string()))?
            .insert(key, value);
        Ok(())
    }

    fn remove(&self, key: String) -> StoreResult<()> {
        self.values
            .write()
            .map_err(|_| StoreError::Preferences("lock poisoned".to_string()))?
            .remove(&key);
        Ok(())
    }

    fn synchronize(&self) -> StoreResult<()> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Memory Vault
// =============================================================================

/// In-memory credential vault with Keychain-like semantics.
///
/// `insert` on an existing key fails with [`StoreError::DuplicateItem`], and
/// items stored [`Accessibility::WhenUnlocked`] cannot be read while the
/// simulated device is locked.
#[derive(Debug, Default)]
pub struct MemoryVault {
    items: Mutex<HashMap<String, (Vec<u8>, Accessibility)>>,
    locked: AtomicBool,
}

impl MemoryVault {
    /// Creates an empty, unlocked vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates locking or unlocking the device.
    pub fn set_device_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::SeqCst);
    }

    /// Returns the accessibility class of the item under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn accessibility(&self, key: &str) -> Option<Accessibility> {
        self.items.lock().unwrap().get(key).map(|(_, class)| *class)
    }

    /// Returns the number of stored items.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    /// Returns `true` if the vault holds no items.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }

    fn items(&self) -> StoreResult<MutexGuard<'_, HashMap<String, (Vec<u8>, Accessibility)>>> {
        self.items
            .lock()
            .map_err(|_| StoreError::Vault("mutex poisoned".to_string()))
    }
}

impl SecureVault for MemoryVault {
    fn insert(
        &self,
        key: String,
        value: Vec<u8>,
        accessibility: Accessibility,
    ) -> StoreResult<()> {
        let mut items = self.items()?;
        if items.contains_key(&key) {
            return Err(StoreError::DuplicateItem(key));
        }
        items.insert(key, (value, accessibility));
        Ok(())
    }

    fn query(&self, key: String) -> StoreResult<Option<Vec<u8>>> {
        let items = self.items()?;
        match items.get(&key) {
            Some((_, Accessibility::WhenUnlocked)) if self.locked.load(Ordering::SeqCst) => {
                Err(StoreError::Vault("interaction not allowed".to_string()))
            }
            Some((value, _)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    fn delete(&self, key: String) -> StoreResult<()> {
        self.items()?.remove(&key);
        Ok(())
    }
}
