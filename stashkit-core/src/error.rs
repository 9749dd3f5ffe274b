//! Error types for the store router and its backends.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the storage backends.
///
/// The plain `set`/`get` entry points of [`crate::StorageContext`] never
/// return these; they are logged and swallowed. The `try_*` and `lookup`
/// variants surface them.
#[derive(Debug, Error, uniffi::Error)]
pub enum StoreError {
    /// Errors coming from the preferences table.
    #[error("preferences error: {0}")]
    Preferences(String),

    /// Errors coming from the secure vault (locked device, denied access, ...).
    #[error("vault error: {0}")]
    Vault(String),

    /// The vault already holds an entry for this key.
    #[error("duplicate vault item: {0}")]
    DuplicateItem(String),

    /// Errors coming from the on-disk file cache.
    #[error("file cache error: {0}")]
    FileCache(String),

    /// The cache directory could not be resolved or created.
    #[error("cache directory unavailable: {0}")]
    CacheDirUnavailable(String),

    /// Serialization/deserialization failures.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Key cannot be used as a file name.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StoreError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
