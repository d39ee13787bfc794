//! Local persistent key/value storage.

use alloc::string::String;

use crate::error::StorageError;

/// Default storage key for the user id.
pub const USER_ID_KEY: &str = "apphub_user_id";

/// Default storage key for the fingerprint.
pub const FINGERPRINT_KEY: &str = "apphub_fingerprint";

/// String key/value storage that survives across sessions on one device.
///
/// Access is single-threaded and unlocked, so implementations use interior
/// mutability and take `&self`.
pub trait KeyValueStore {
    /// Read a value. Missing keys and unreadable storage both yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
