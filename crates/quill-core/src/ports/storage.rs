//! File storage port for uploaded assets.

use async_trait::async_trait;

/// File storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No file exists at the given path.
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("storage i/o error: {0}")]
    Io(String),
}

/// Publicly served file storage.
///
/// Paths are relative (`bucket/name`); turning them into URLs is the
/// caller's concern.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` under `bucket/name` and return the stored path.
    async fn store(&self, bucket: &str, name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Whether a file exists at `path`.
    async fn exists(&self, path: &str) -> bool;

    /// Remove the file at `path`.
    ///
    /// Deleting a path that was never stored is [`StorageError::NotFound`].
    async fn delete(&self, path: &str) -> Result<(), StorageError>;
}
