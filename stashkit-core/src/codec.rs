//! Value encoding for stored payloads.
//!
//! The router stores opaque bytes. A [`Codec`] turns typed values into those
//! bytes and back; [`JsonCodec`] is the default.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{StoreError, StoreResult};

/// Encodes values to payload bytes and decodes them back.
pub trait Codec: Send + Sync {
    /// Encodes `value` into a payload.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the value cannot be represented.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<Vec<u8>>;

    /// Decodes a payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the payload is corrupt or does
    /// not match `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T>;
}

/// JSON payloads via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> StoreResult<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Outcome of a typed read.
///
/// Separates "nothing stored" from "stored but unreadable", which the plain
/// `get` path folds together into `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// A payload was stored and decoded.
    Found(T),
    /// Nothing is stored under the key, or the backend refused the read.
    Missing,
    /// A payload exists but does not decode as the requested type.
    Corrupt(String),
}

impl<T> Lookup<T> {
    /// Returns the decoded value, dropping the missing/corrupt distinction.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing | Self::Corrupt(_) => None,
        }
    }

    /// Returns `true` if a value was decoded.
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub(crate) fn from_decoded(decoded: StoreResult<T>) -> Self {
        match decoded {
            Ok(value) => Self::Found(value),
            Err(err) => Self::Corrupt(err.to_string()),
        }
    }
}
