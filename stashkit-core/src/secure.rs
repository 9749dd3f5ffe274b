//! Secure-mode backend.
//!
//! Every vault access goes through one mutex, so a delete-then-insert never
//! interleaves with another write or a read, for any key.

use std::sync::{Arc, Mutex, MutexGuard};

use zeroize::Zeroizing;

use crate::error::{StoreError, StoreResult};
use crate::platform::{Accessibility, SecureVault};

/// Accessibility class used for every item written by the router.
pub const ITEM_ACCESSIBILITY: Accessibility = Accessibility::WhenUnlocked;

/// Serialized access to a [`SecureVault`].
pub struct SecureStore {
    vault: Arc<dyn SecureVault>,
    lock: Mutex<()>,
}

impl SecureStore {
    /// Wraps `vault`.
    #[must_use]
    pub fn new(vault: Arc<dyn SecureVault>) -> Self {
        Self {
            vault,
            lock: Mutex::new(()),
        }
    }

    /// Replaces the item under `key` with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns the vault error if the delete or the insert fails.
    pub fn write(&self, key: &str, bytes: Vec<u8>) -> StoreResult<()> {
        let _guard = self.guard()?;
        self.vault.delete(key.to_string())?;
        self.vault.insert(key.to_string(), bytes, ITEM_ACCESSIBILITY)
    }

    /// Reads the item under `key`. The returned buffer is wiped on drop.
    ///
    /// # Errors
    ///
    /// Returns the vault error if the query fails.
    pub fn read(&self, key: &str) -> StoreResult<Option<Zeroizing<Vec<u8>>>> {
        let _guard = self.guard()?;
        Ok(self.vault.query(key.to_string())?.map(Zeroizing::new))
    }

    /// Deletes the item under `key`.
    ///
    /// # Errors
    ///
    /// Returns the vault error if the delete fails.
    pub fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.guard()?;
        self.vault.delete(key.to_string())
    }

    fn guard(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| StoreError::Vault("secure store lock poisoned".to_string()))
    }
}

impl std::fmt::Debug for SecureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureStore").finish_non_exhaustive()
    }
}
