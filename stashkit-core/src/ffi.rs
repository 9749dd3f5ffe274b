//! Store router exported to host languages.
//!
//! Foreign callers cannot use the generic typed API, so this object works on
//! raw payloads and on JSON text. JSON text written here is stored as the
//! same bytes [`crate::JsonCodec`] would produce, so values are shared with
//! Rust callers using the default codec.

use std::sync::Arc;

use crate::context::StorageContext;
use crate::error::{StoreError, StoreResult};
use crate::mode::Mode;
use crate::paths::CachePaths;
use crate::platform::{PreferencesStore, SecureVault, StorageProvider};

/// Key-value store handle for host applications.
#[derive(Debug, uniffi::Object)]
pub struct KeyValueStore {
    context: StorageContext,
}

impl KeyValueStore {
    /// Returns the underlying router.
    #[must_use]
    pub const fn context(&self) -> &StorageContext {
        &self.context
    }
}

#[uniffi::export]
impl KeyValueStore {
    /// Creates a store from explicit backends.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(
        paths: Arc<CachePaths>,
        preferences: Arc<dyn PreferencesStore>,
        vault: Arc<dyn SecureVault>,
    ) -> Self {
        Self {
            context: StorageContext::new(paths, preferences, vault),
        }
    }

    /// Creates a store from a platform provider.
    #[uniffi::constructor]
    #[must_use]
    pub fn from_provider(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            context: StorageContext::from_provider(provider.as_ref()),
        }
    }

    /// Stores a raw payload. Failures are logged, not returned.
    pub fn set_bytes(&self, key: String, value: Vec<u8>, mode: Mode) {
        self.context.set_bytes(&key, value, mode);
    }

    /// Reads a raw payload; `None` on miss or failure.
    #[must_use]
    pub fn get_bytes(&self, key: String, mode: Mode) -> Option<Vec<u8>> {
        self.context.get_bytes(&key, mode)
    }

    /// Stores a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if `json` is not valid JSON, or
    /// the backend error.
    pub fn set_json(&self, key: String, json: String, mode: Mode) -> StoreResult<()> {
        let value: serde_json::Value = serde_json::from_str(&json)?;
        self.context.try_set(&key, &value, mode)
    }

    /// Reads a JSON document; `None` if missing or not valid JSON.
    #[must_use]
    pub fn get_json(&self, key: String, mode: Mode) -> Option<String> {
        self.context
            .get::<serde_json::Value>(&key, mode)
            .map(|value| value.to_string())
    }

    /// Deletes the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub fn remove(&self, key: String, mode: Mode) -> StoreResult<()> {
        self.context.try_remove(&key, mode)
    }

    /// Returns the resolved file-mode cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CacheDirUnavailable`] if it cannot be resolved.
    pub fn cache_dir(&self) -> StoreResult<String> {
        self.context.paths().cache_dir_path_string()
    }
}
