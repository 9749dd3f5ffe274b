//! The store router.
//!
//! A [`StorageContext`] is created once by the host and shared (usually in
//! an `Arc`) with everything that persists values. It owns the file-mode
//! cache and the secure-mode lock, and routes each call to a backend by
//! [`Mode`].

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::codec::{Codec, JsonCodec, Lookup};
use crate::error::StoreResult;
use crate::file_cache::FileCache;
use crate::mode::Mode;
use crate::paths::CachePaths;
use crate::platform::{PreferencesStore, SecureVault, StorageProvider};
use crate::secure::SecureStore;

/// Routes typed values to the file cache, preferences table or secure vault.
///
/// The plain [`set`](Self::set) / [`get`](Self::get) pair never fails:
/// failures are logged, writes become no-ops and reads come back `None`.
/// Use [`try_set`](Self::try_set) and [`lookup`](Self::lookup) to see them.
pub struct StorageContext<C: Codec = JsonCodec> {
    codec: C,
    files: FileCache,
    preferences: Arc<dyn PreferencesStore>,
    secure: SecureStore,
}

impl StorageContext<JsonCodec> {
    /// Creates a context using JSON payloads.
    #[must_use]
    pub fn new(
        paths: Arc<CachePaths>,
        preferences: Arc<dyn PreferencesStore>,
        vault: Arc<dyn SecureVault>,
    ) -> Self {
        Self::with_codec(JsonCodec, paths, preferences, vault)
    }

    /// Creates a context from a platform provider.
    #[must_use]
    pub fn from_provider(provider: &dyn StorageProvider) -> Self {
        Self::new(provider.paths(), provider.preferences(), provider.vault())
    }
}

impl<C: Codec> StorageContext<C> {
    /// Creates a context with a custom payload codec.
    #[must_use]
    pub fn with_codec(
        codec: C,
        paths: Arc<CachePaths>,
        preferences: Arc<dyn PreferencesStore>,
        vault: Arc<dyn SecureVault>,
    ) -> Self {
        Self {
            codec,
            files: FileCache::new(paths),
            preferences,
            secure: SecureStore::new(vault),
        }
    }

    /// Returns the file-mode cache location.
    #[must_use]
    pub fn paths(&self) -> &CachePaths {
        self.files.paths()
    }

    /// Returns the codec used for payloads.
    #[must_use]
    pub const fn codec(&self) -> &C {
        &self.codec
    }

    /// Encodes `value` and stores it under `key` in `mode`.
    ///
    /// A value that fails to encode is stored as an empty payload, which
    /// later reads treat as corrupt. Backend failures are logged and dropped.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, mode: Mode) {
        let bytes = self.codec.encode(value).unwrap_or_else(|err| {
            log::warn!("encoding {mode} value for {key} failed, storing empty payload: {err}");
            Vec::new()
        });
        self.set_bytes(key, bytes, mode);
    }

    /// Like [`set`](Self::set), but reports failures.
    ///
    /// Nothing is written if encoding fails.
    ///
    /// # Errors
    ///
    /// Returns the encode error or the backend error.
    pub fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        mode: Mode,
    ) -> StoreResult<()> {
        let bytes = self.codec.encode(value)?;
        self.try_set_bytes(key, bytes, mode)
    }

    /// Reads and decodes the value under `key` in `mode`.
    ///
    /// Returns `None` if nothing is stored, the payload does not decode as
    /// `T`, or the backend refused the read.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str, mode: Mode) -> Option<T> {
        self.lookup(key, mode).found()
    }

    /// Reads the value under `key`, distinguishing missing from corrupt.
    ///
    /// Backend read errors are logged and reported as [`Lookup::Missing`]:
    /// a locked vault looks the same as an empty one.
    #[must_use]
    pub fn lookup<T: DeserializeOwned>(&self, key: &str, mode: Mode) -> Lookup<T> {
        match mode {
            Mode::Secure => match self.secure.read(key) {
                Ok(Some(bytes)) => Lookup::from_decoded(self.codec.decode(&bytes)),
                Ok(None) => Lookup::Missing,
                Err(err) => {
                    log::warn!("secure read of {key} failed: {err}");
                    Lookup::Missing
                }
            },
            Mode::File | Mode::Preferences => match self.try_get_bytes(key, mode) {
                Ok(Some(bytes)) => Lookup::from_decoded(self.codec.decode(&bytes)),
                Ok(None) => Lookup::Missing,
                Err(err) => {
                    log::warn!("{mode} read of {key} failed: {err}");
                    Lookup::Missing
                }
            },
        }
    }

    /// Deletes the value under `key` in `mode`. Failures are logged.
    pub fn remove(&self, key: &str, mode: Mode) {
        if let Err(err) = self.try_remove(key, mode) {
            log::warn!("{mode} remove of {key} failed: {err}");
        }
    }

    /// Deletes the value under `key` in `mode`.
    ///
    /// Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub fn try_remove(&self, key: &str, mode: Mode) -> StoreResult<()> {
        match mode {
            Mode::File => self.files.remove(key),
            Mode::Preferences => {
                self.preferences.remove(key.to_string())?;
                self.preferences.synchronize()
            }
            Mode::Secure => self.secure.remove(key),
        }
    }

    /// Stores a raw payload. Failures are logged.
    pub fn set_bytes(&self, key: &str, bytes: Vec<u8>, mode: Mode) {
        if let Err(err) = self.try_set_bytes(key, bytes, mode) {
            log::warn!("{mode} write of {key} failed: {err}");
        }
    }

    /// Stores a raw payload.
    ///
    /// # Errors
    ///
    /// Returns the backend error. In file mode the memory cache has already
    /// been updated when a disk error is returned.
    pub fn try_set_bytes(&self, key: &str, bytes: Vec<u8>, mode: Mode) -> StoreResult<()> {
        log::trace!("{mode} write of {key} ({} bytes)", bytes.len());
        match mode {
            Mode::File => self.files.write(key, bytes),
            Mode::Preferences => {
                self.preferences.set(key.to_string(), bytes)?;
                self.preferences.synchronize()
            }
            Mode::Secure => self.secure.write(key, bytes),
        }
    }

    /// Reads a raw payload, `None` on miss or failure.
    #[must_use]
    pub fn get_bytes(&self, key: &str, mode: Mode) -> Option<Vec<u8>> {
        self.try_get_bytes(key, mode).unwrap_or_else(|err| {
            log::warn!("{mode} read of {key} failed: {err}");
            None
        })
    }

    /// Reads a raw payload.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub fn try_get_bytes(&self, key: &str, mode: Mode) -> StoreResult<Option<Vec<u8>>> {
        match mode {
            Mode::File => self.files.read(key),
            Mode::Preferences => self.preferences.get(key.to_string()),
            Mode::Secure => Ok(self.secure.read(key)?.map(|bytes| bytes.to_vec())),
        }
    }
}

impl<C: Codec> std::fmt::Debug for StorageContext<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageContext")
            .field("files", &self.files)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}
