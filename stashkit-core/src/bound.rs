//! Values bound to a persisted key.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::codec::{Codec, JsonCodec};
use crate::context::StorageContext;
use crate::mode::Mode;

type ChangeHook<T> = Box<dyn Fn(&T) + Send + Sync>;

/// A value that loads itself from a [`StorageContext`] once, at
/// construction, and writes itself back on every assignment.
///
/// ```
/// use std::sync::Arc;
///
/// use stashkit_core::platform::memory::{MemoryPreferences, MemoryVault};
/// use stashkit_core::{Bound, CachePaths, Mode, StorageContext};
///
/// let root = std::env::temp_dir().join("stashkit-doc-bound");
/// let ctx = Arc::new(StorageContext::new(
///     Arc::new(CachePaths::with_root(&root, "doc")),
///     Arc::new(MemoryPreferences::new()),
///     Arc::new(MemoryVault::new()),
/// ));
///
/// let mut launches = Bound::new(Arc::clone(&ctx), "launches", Mode::Preferences, 0u32);
/// launches.set(launches.get() + 1);
/// assert_eq!(ctx.get::<u32>("launches", Mode::Preferences), Some(1));
/// ```
pub struct Bound<T, C: Codec = JsonCodec> {
    context: Arc<StorageContext<C>>,
    key: String,
    mode: Mode,
    value: T,
    on_change: Option<ChangeHook<T>>,
}

impl<T, C> Bound<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    /// Loads the value stored under `key`, or adopts `default` and persists
    /// it if nothing readable is stored.
    ///
    /// An unreadable value counts as absent, so a corrupt payload or a
    /// vault read denied while the device is locked is overwritten by
    /// `default` whenever the backend accepts the write. For secure keys,
    /// construct bindings while the device is unlocked.
    pub fn new(
        context: Arc<StorageContext<C>>,
        key: impl Into<String>,
        mode: Mode,
        default: T,
    ) -> Self {
        let key = key.into();
        let value = match context.get::<T>(&key, mode) {
            Some(stored) => stored,
            None => {
                log::debug!("seeding {mode} default for {key}");
                context.set(&key, &default, mode);
                default
            }
        };
        Self {
            context,
            key,
            mode,
            value,
            on_change: None,
        }
    }

    /// Like [`new`](Self::new), calling `hook` after every assignment.
    ///
    /// The hook is not called for the initial load.
    pub fn with_hook(
        context: Arc<StorageContext<C>>,
        key: impl Into<String>,
        mode: Mode,
        default: T,
        hook: impl Fn(&T) + Send + Sync + 'static,
    ) -> Self {
        let mut bound = Self::new(context, key, mode, default);
        bound.on_change = Some(Box::new(hook));
        bound
    }

    /// Returns the current value. Never reads the backend.
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the value, persists it, then calls the change hook.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.commit();
    }

    /// Mutates the value in place, then persists it and calls the change hook.
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.commit();
    }

    /// The persisted key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backend this value lives in.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Consumes the binding, returning the current value.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }

    fn commit(&self) {
        self.context.set(&self.key, &self.value, self.mode);
        if let Some(hook) = &self.on_change {
            hook(&self.value);
        }
    }
}

impl<T: std::fmt::Debug, C: Codec> std::fmt::Debug for Bound<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bound")
            .field("key", &self.key)
            .field("mode", &self.mode)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde::Deserialize;
    use test_case::test_case;

    use super::*;
    use crate::paths::CachePaths;
    use crate::platform::memory::{MemoryPreferences, MemoryVault};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Settings {
        volume: u8,
        muted: bool,
    }

    fn context(root: &tempfile::TempDir) -> Arc<StorageContext> {
        Arc::new(StorageContext::new(
            Arc::new(CachePaths::with_root(root.path(), "app")),
            Arc::new(MemoryPreferences::new()),
            Arc::new(MemoryVault::new()),
        ))
    }

    #[test_case(Mode::File)]
    #[test_case(Mode::Preferences)]
    #[test_case(Mode::Secure)]
    fn default_is_adopted_and_persisted(mode: Mode) {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(&root);
        let defaults = Settings {
            volume: 5,
            muted: false,
        };

        let bound = Bound::new(Arc::clone(&ctx), "settings", mode, defaults.clone());

        assert_eq!(bound.get(), &defaults);
        assert_eq!(ctx.get::<Settings>("settings", mode), Some(defaults));
    }

    #[test_case(Mode::File)]
    #[test_case(Mode::Preferences)]
    #[test_case(Mode::Secure)]
    fn stored_value_wins_over_default(mode: Mode) {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(&root);
        ctx.set("name", &"stored", mode);

        let bound = Bound::new(Arc::clone(&ctx), "name", mode, "default".to_string());

        assert_eq!(bound.get(), "stored");
        assert_eq!(ctx.get::<String>("name", mode), Some("stored".to_string()));
    }

    #[test]
    fn corrupt_stored_value_falls_back_to_default() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(&root);
        ctx.set("count", &"not a number", Mode::File);

        let bound = Bound::new(Arc::clone(&ctx), "count", Mode::File, 3u32);

        assert_eq!(*bound.get(), 3);
        assert_eq!(ctx.get::<u32>("count", Mode::File), Some(3));
    }

    #[test_case(Mode::File)]
    #[test_case(Mode::Preferences)]
    #[test_case(Mode::Secure)]
    fn assignment_writes_through(mode: Mode) {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(&root);
        let mut bound = Bound::new(Arc::clone(&ctx), "count", mode, 0u32);

        bound.set(7);
        assert_eq!(ctx.get::<u32>("count", mode), Some(7));

        bound.update(|count| *count += 1);
        assert_eq!(*bound.get(), 8);
        assert_eq!(ctx.get::<u32>("count", mode), Some(8));
    }

    #[test]
    fn reads_do_not_see_out_of_band_writes() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(&root);
        let bound = Bound::new(Arc::clone(&ctx), "count", Mode::Preferences, 1u32);

        ctx.set("count", &99u32, Mode::Preferences);

        assert_eq!(*bound.get(), 1);
        assert_eq!(bound.into_inner(), 1);
    }

    #[test]
    fn hook_sees_each_assignment_after_persisting() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context(&root);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut bound = {
            let seen = Arc::clone(&seen);
            let hook_ctx = Arc::clone(&ctx);
            Bound::with_hook(Arc::clone(&ctx), "volume", Mode::File, 1u8, move |v| {
                // The new value is already persisted when the hook runs.
                assert_eq!(hook_ctx.get::<u8>("volume", Mode::File), Some(*v));
                seen.lock().unwrap().push(*v);
            })
        };
        assert!(seen.lock().unwrap().is_empty());

        bound.set(4);
        bound.set(9);

        assert_eq!(*seen.lock().unwrap(), vec![4, 9]);
        assert_eq!(bound.key(), "volume");
        assert_eq!(bound.mode(), Mode::File);
    }
}
