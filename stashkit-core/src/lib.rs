//! Key-value persistence for mobile applications.
//!
//! One router, [`StorageContext`], stores serializable values under string
//! keys in one of three backends selected by [`Mode`]:
//!
//! - [`Mode::File`]: one file per key in the app cache directory, with an
//!   in-memory read-through map.
//! - [`Mode::Preferences`]: the host's preferences table, synchronized on
//!   every write.
//! - [`Mode::Secure`]: the host's credential vault, behind a single lock.
//!
//! [`Bound`] couples one value to one key: it loads (or seeds) on
//! construction and writes back on every assignment.
//!
//! The preferences table and the vault are provided by the host through the
//! [`platform`] traits, which are exported to Swift and Kotlin via `UniFFI`.

pub mod bound;
pub mod codec;
pub mod context;
pub mod error;
pub mod file_cache;
pub mod logger;
pub mod paths;
pub mod platform;
pub mod secure;

mod ffi;
mod mode;

pub use bound::Bound;
pub use codec::{Codec, JsonCodec, Lookup};
pub use context::StorageContext;
pub use error::{StoreError, StoreResult};
pub use ffi::KeyValueStore;
pub use mode::Mode;
pub use paths::CachePaths;
pub use platform::{Accessibility, PreferencesStore, SecureVault, StorageProvider};

uniffi::setup_scaffolding!("stashkit_core");
