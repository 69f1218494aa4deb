//! Shared application state handed to every request handler.

use std::sync::Arc;

use quill_core::ports::{
    CommentRepository, FileStore, PostRepository, TagRepository, UserRepository,
};
use quill_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};
use quill_infra::storage::DiskFileStore;

use crate::config::StorageConfig;

/// Repositories and services behind trait objects so handlers stay
/// decoupled from the concrete adapters.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub files: Arc<dyn FileStore>,
    pub public_base_url: String,
}

impl AppState {
    pub fn new(
        connections: DatabaseConnections,
        files: DiskFileStore,
        storage: &StorageConfig,
    ) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            comments: Arc::new(PostgresCommentRepository::new(connections.main.clone())),
            tags: Arc::new(PostgresTagRepository::new(connections.main)),
            files: Arc::new(files),
            public_base_url: storage.public_base_url.clone(),
        }
    }
}
