//! Persistent key-value storage for the cart.
//!
//! The cart is mirrored into a single string slot (JSON) after every
//! successful mutation and read back once at startup. Backends only need
//! `get_item`/`set_item`; writes are synchronous and never batched.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when reading or writing a storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized for storage.
    #[error("Storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string-keyed durable slot store.
pub trait CartStorage: Send + Sync {
    /// Read a slot. `Ok(None)` if it has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
