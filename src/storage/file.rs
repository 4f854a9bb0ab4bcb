//! File-backed key-value storage.
//!
//! Each key maps to one file under a root directory. Writes land in a
//! temporary file first and are moved into place with a rename, so a crash
//! mid-write leaves the previous value intact rather than a torn file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{CartStorage, StorageError};

/// Durable key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default storage root: `<platform data dir>/marketcart`.
    ///
    /// Falls back to the current directory if the platform has no data dir.
    pub fn default_root() -> PathBuf {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("marketcart")
    }

    /// The root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a storage key to a safe file stem.
///
/// Keys are namespaced strings like `@marketcart:products`; anything outside
/// `[A-Za-z0-9._-]` becomes `_`. Distinct keys in practice differ in their
/// alphanumeric parts, so collisions are not a concern here.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl CartStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read { path, source: e }),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let path = self.path_for(key);

        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Write {
                path: self.root.clone(),
                source: e,
            })?;

        // Unique temp name per process; writes within a process are already
        // serialized by the cart worker.
        let tmp = path.with_extension(format!("tmp.{}", std::process::id()));

        fs::write(&tmp, &value)
            .await
            .map_err(|e| StorageError::Write {
                path: tmp.clone(),
                source: e,
            })?;

        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::Write { path, source: e })
    }
}
