//! Disk-backed file storage.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use quill_core::ports::{FileStore, StorageError};

/// File storage rooted at a local directory.
///
/// Stored paths are relative to the root and use `/` separators, so the
/// same string works as a URL suffix when the root is served statically.
#[derive(Clone)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Resolve a relative path under the root.
    ///
    /// Only plain path segments are accepted; `..`, absolute paths and
    /// the like cannot escape the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        if path.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::Io(format!("invalid storage path: {path}")));
        }
        Ok(self.root.join(relative))
    }
}

fn map_io_error(path: &str, e: io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound(path.to_owned()),
        _ => StorageError::Io(e.to_string()),
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn store(&self, bucket: &str, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let relative = format!("{bucket}/{name}");
        let full = self.resolve(&relative)?;

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        fs::write(&full, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(relative)
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(full) => fs::try_exists(full).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        // A path that cannot live under the root has nothing to delete.
        let Ok(full) = self.resolve(path) else {
            return Err(StorageError::NotFound(path.to_owned()));
        };
        fs::remove_file(full)
            .await
            .map_err(|e| map_io_error(path, e))
    }
}
