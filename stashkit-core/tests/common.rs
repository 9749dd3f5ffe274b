//! Common test utilities shared across integration tests.

#![allow(dead_code, missing_docs)]

use std::path::Path;
use std::sync::Arc;

use stashkit_core::platform::memory::MemoryVault;
use stashkit_core::platform::FilePreferences;
use stashkit_core::{CachePaths, PreferencesStore, SecureVault, StorageContext, StorageProvider};

pub const APP_ID: &str = "com.example.notes";

/// Provider with durable file-backed preferences and a shared in-memory
/// vault, so a "fresh process" can be simulated by building a second
/// context over the same root and vault.
pub struct DurableProvider {
    paths: Arc<CachePaths>,
    preferences: Arc<FilePreferences>,
    vault: Arc<MemoryVault>,
}

impl DurableProvider {
    pub fn new(root: &Path, vault: Arc<MemoryVault>) -> Self {
        let preferences =
            FilePreferences::open(root.join("preferences.json")).expect("open preferences");
        Self {
            paths: Arc::new(CachePaths::with_root(root.join("cache"), APP_ID)),
            preferences: Arc::new(preferences),
            vault,
        }
    }
}

impl StorageProvider for DurableProvider {
    fn preferences(&self) -> Arc<dyn PreferencesStore> {
        self.preferences.clone()
    }

    fn vault(&self) -> Arc<dyn SecureVault> {
        self.vault.clone()
    }

    fn paths(&self) -> Arc<CachePaths> {
        Arc::clone(&self.paths)
    }
}

/// Builds a context as a freshly started process would.
pub fn open_context(root: &Path, vault: &Arc<MemoryVault>) -> Arc<StorageContext> {
    let provider = DurableProvider::new(root, Arc::clone(vault));
    Arc::new(StorageContext::from_provider(&provider))
}

pub fn cache_file(root: &Path, key: &str) -> std::path::PathBuf {
    root.join("cache").join(APP_ID).join(key)
}
