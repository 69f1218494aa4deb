use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, CommentWithAuthor, Post, PostDetail, Tag, User};
use crate::error::RepoError;

/// User persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Persist a new user.
    async fn create(&self, user: User) -> Result<User, RepoError>;
}

/// Post persistence, including eager-loaded reads and the tag junction.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// All posts with author, tags and comments, newest first.
    async fn list_feed(&self) -> Result<Vec<PostDetail>, RepoError>;

    /// One post with author, tags and comments.
    async fn fetch_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError>;

    /// Persist a new post and attach exactly `tag_ids`.
    async fn create(&self, post: Post, tag_ids: &[Uuid]) -> Result<Post, RepoError>;

    /// Persist changes to an existing post and replace its tag set with
    /// exactly `tag_ids`.
    async fn update(&self, post: Post, tag_ids: &[Uuid]) -> Result<Post, RepoError>;

    /// Delete a post. Comments and tag links go with it.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Comment persistence.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on a post with their authors, newest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError>;

    /// Persist a new comment and return it with its author attached.
    async fn create(&self, comment: Comment) -> Result<CommentWithAuthor, RepoError>;
}

/// Tag lookups. Tags are seeded by migration and never mutated at runtime.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// All tags, ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;

    /// The subset of `ids` that actually exist.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError>;
}
