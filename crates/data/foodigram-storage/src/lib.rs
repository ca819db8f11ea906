//! # Foodigram Storage
//!
//! The one piece of state that outlives a process: a flat map of string keys
//! to string values. Three keys are in use:
//!
//! - [`IS_LOGGED_IN`]: `"true"` after a successful login, absent otherwise
//! - [`SCRAPPED_ITEMS`]: the scrapped history, as JSON
//! - [`SESSION_COOKIES`]: backend session cookies, so a sign-in survives restarts
//!
//! [`FileStore`] keeps the map in a JSON file and rewrites it atomically on
//! every change. [`MemoryStore`] is the same contract without a disk.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};

/// Set to `"true"` on successful login, removed on logout
pub const IS_LOGGED_IN: &str = "IS_LOGGED_IN";

/// JSON-encoded scrapped history
pub const SCRAPPED_ITEMS: &str = "SCRAPPED_ITEMS";

/// Cookie header (`name=value; name=value`) captured after sign-in
pub const SESSION_COOKIES: &str = "SESSION_COOKIES";

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Corrupt value under key {key}: {reason}")]
    CorruptValue { key: String, reason: String },
}

/// Durable string key/value store
pub trait KeyValueStore {
    /// Read a value; `None` if the key was never written or was removed
    fn load_string(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn save_string(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Read and decode a JSON value
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.load_string(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::CorruptValue {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value
    fn save_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        let raw = serde_json::to_string(value)?;
        self.save_string(key, &raw)
    }
}
