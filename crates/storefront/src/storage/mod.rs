//! Durable key-value storage for client state.
//!
//! The cart and the auth session each live under one key as a JSON document.
//! Two backends are provided:
//!
//! - [`FileStorage`] - one file per key under the client's data directory
//! - [`MemoryStorage`] - process-local map, used by tests and ephemeral runs
//!
//! Stores are generic over [`Storage`], so a fake can be injected wherever the
//! real backend would be used.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys for persisted client state.
pub mod keys {
    /// Key for the shopping cart (JSON array of line items).
    pub const CART: &str = "francine_cart";

    /// Key for the authenticated session (JSON `{token, user}`).
    pub const AUTH: &str = "francine_auth";
}

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value could not be decoded.
    #[error("malformed value under {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The value could not be encoded.
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// Key contains characters that cannot be used as a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The in-memory backend's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A synchronous string key-value store.
///
/// Writes must be durable by the time they return: callers rely on storage
/// matching in-memory state as soon as a mutation completes.
pub trait Storage {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be durably written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns `StorageError::Malformed` if a value exists but does not decode
/// as `T`, or any backend read error.
pub fn load_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let Some(raw) = storage.read(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_owned(),
            source,
        })
}

/// Encode and write a JSON value.
///
/// # Errors
///
/// Returns an error if encoding or the backend write fails.
pub fn save_json<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(StorageError::Encode)?;
    storage.write(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_absent() {
        let storage = MemoryStorage::new();
        let value: Option<Vec<u32>> = load_json(&storage, "missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_load_json_malformed() {
        let storage = MemoryStorage::new();
        storage.write(keys::CART, "{not json").unwrap();
        let result: Result<Option<Vec<u32>>, _> = load_json(&storage, keys::CART);
        assert!(matches!(result, Err(StorageError::Malformed { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        save_json(&storage, "numbers", &[1, 2, 3]).unwrap();
        let value: Option<Vec<u32>> = load_json(&storage, "numbers").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }
}
