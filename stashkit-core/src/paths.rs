//! Cache location helpers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{StoreError, StoreResult};

/// Location of the file-mode cache: `<root>/<app_id>`.
///
/// `root` defaults to the OS cache directory. The full path is resolved and
/// created on first use, then reused for the lifetime of this value.
#[derive(Debug, uniffi::Object)]
pub struct CachePaths {
    app_id: String,
    root: Option<PathBuf>,
    resolved: OnceLock<PathBuf>,
}

impl CachePaths {
    /// Cache paths under the OS cache directory for `app_id`.
    #[must_use]
    pub fn for_app(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            root: None,
            resolved: OnceLock::new(),
        }
    }

    /// Cache paths under an explicit `root` instead of the OS cache directory.
    #[must_use]
    pub fn with_root(root: impl AsRef<Path>, app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            root: Some(root.as_ref().to_path_buf()),
            resolved: OnceLock::new(),
        }
    }

    /// Returns the application identifier.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the cache directory, creating it on first call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CacheDirUnavailable`] if the OS exposes no cache
    /// directory, the application identifier is not a single path segment,
    /// or the directory cannot be created.
    pub fn cache_dir(&self) -> StoreResult<&Path> {
        if let Some(dir) = self.resolved.get() {
            return Ok(dir);
        }
        let dir = self.resolve()?;
        fs::create_dir_all(&dir).map_err(|err| {
            StoreError::CacheDirUnavailable(format!("{}: {err}", dir.display()))
        })?;
        log::debug!("file cache directory resolved to {}", dir.display());
        Ok(self.resolved.get_or_init(|| dir))
    }

    /// Returns the path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid file name or the cache
    /// directory is unavailable.
    pub fn entry_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.cache_dir()?.join(key))
    }

    fn resolve(&self) -> StoreResult<PathBuf> {
        if !is_single_segment(&self.app_id) {
            return Err(StoreError::CacheDirUnavailable(format!(
                "invalid application identifier {:?}",
                self.app_id
            )));
        }
        let root = match &self.root {
            Some(root) => root.clone(),
            None => dirs::cache_dir().ok_or_else(|| {
                StoreError::CacheDirUnavailable("no OS cache directory".to_string())
            })?,
        };
        Ok(root.join(&self.app_id))
    }
}

#[uniffi::export]
impl CachePaths {
    /// Cache paths rooted at `root` for `app_id`.
    #[uniffi::constructor]
    #[must_use]
    pub fn from_root(root: String, app_id: String) -> Self {
        Self::with_root(PathBuf::from(root), app_id)
    }

    /// Cache paths under the OS cache directory for `app_id`.
    #[uniffi::constructor]
    #[must_use]
    pub fn from_app_id(app_id: String) -> Self {
        Self::for_app(app_id)
    }

    /// Returns the resolved cache directory as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be resolved or created.
    pub fn cache_dir_path_string(&self) -> StoreResult<String> {
        Ok(self.cache_dir()?.to_string_lossy().to_string())
    }
}

/// Keys become file names verbatim, so they must be a single path segment.
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    if is_single_segment(key) {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

fn is_single_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
