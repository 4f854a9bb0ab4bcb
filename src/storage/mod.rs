//! Key-value byte storage used to persist cart snapshots.
//!
//! The cart store only ever needs `get` and `set` under a fixed key, so the
//! seam is kept that narrow. `FileStorage` is the durable on-device
//! implementation; `MemoryStorage` backs tests and ephemeral sessions.

mod file;
mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors from the underlying key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Asynchronous key-value byte store.
///
/// Implementations must be safe to share across tasks; the cart store keeps
/// one behind an `Arc` and drives all writes from a single worker.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Fetch the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
}
