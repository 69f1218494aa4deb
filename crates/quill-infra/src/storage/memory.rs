//! In-memory file storage - used for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{FileStore, StorageError};

/// File storage held entirely in memory.
///
/// Note: Data is lost on process restart.
pub struct MemoryFileStore {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn store(&self, bucket: &str, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = format!("{bucket}/{name}");
        self.files
            .write()
            .await
            .insert(path.clone(), bytes.to_vec());
        Ok(path)
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.read().await.contains_key(path)
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        match self.files.write().await.remove(path) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(path.to_owned())),
        }
    }
}
