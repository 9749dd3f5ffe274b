//! Platform interfaces for the preferences and secure-vault backends.
//!
//! The host application provides these. On iOS the preferences table is
//! `UserDefaults` and the vault is Keychain Services; on Android they map to
//! `SharedPreferences` and the Android Keystore-backed encrypted prefs.
//!
//! [`memory`] carries in-process implementations for tests and host-less
//! use, and [`FilePreferences`] is a durable preferences table for native
//! targets.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::paths::CachePaths;

mod file_prefs;
pub mod memory;

pub use file_prefs::FilePreferences;

/// When a vault item may be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Accessibility {
    /// Readable only while the device is unlocked.
    /// iOS: `kSecAttrAccessibleWhenUnlocked`.
    WhenUnlocked,
    /// Readable after the first unlock following a reboot.
    AfterFirstUnlock,
}

/// Process-wide key/value preferences table.
///
/// Implementations are expected to be internally thread-safe; the router
/// applies no locking of its own around this backend.
#[uniffi::export(with_foreign)]
pub trait PreferencesStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    fn get(&self, key: String) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&self, key: String, value: Vec<u8>) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    fn remove(&self, key: String) -> StoreResult<()>;

    /// Flushes pending writes to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    fn synchronize(&self) -> StoreResult<()>;
}

/// OS credential vault.
///
/// Mirrors the Keychain item API: `insert` fails with
/// [`crate::StoreError::DuplicateItem`] when the key already exists, so the
/// router deletes before inserting.
#[uniffi::export(with_foreign)]
pub trait SecureVault: Send + Sync {
    /// Adds a new item.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateItem` if `key` already exists, or a vault error if
    /// the item cannot be stored.
    fn insert(
        &self,
        key: String,
        value: Vec<u8>,
        accessibility: Accessibility,
    ) -> StoreResult<()>;

    /// Returns the item stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if access is denied (e.g. the device is locked).
    fn query(&self, key: String) -> StoreResult<Option<Vec<u8>>>;

    /// Deletes the item stored under `key`. Deleting an absent key is not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault refuses the deletion.
    fn delete(&self, key: String) -> StoreResult<()>;
}

/// Provider responsible for the platform backends and the cache location.
#[uniffi::export(with_foreign)]
pub trait StorageProvider: Send + Sync {
    /// Returns the preferences table implementation.
    fn preferences(&self) -> Arc<dyn PreferencesStore>;

    /// Returns the secure vault implementation.
    fn vault(&self) -> Arc<dyn SecureVault>;

    /// Returns the cache location selected by the platform.
    fn paths(&self) -> Arc<CachePaths>;
}
