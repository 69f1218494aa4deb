use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CommentWithAuthor, Tag, User};

/// Post entity - a feed entry written by one author.
///
/// The title is optional; the body is required free text and may embed
/// markdown image links produced by the upload flow. A post with no tags
/// carries an empty tag set, never an absent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub body: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and timestamps.
    pub fn new(user_id: Uuid, title: Option<String>, body: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            body,
            image_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an author edit, bumping the update timestamp.
    pub fn edit(&mut self, title: Option<String>, body: String) {
        self.title = title;
        self.body = body;
        self.updated_at = Utc::now();
    }

    /// Whether `user_id` is the post's author. Only the author may mutate
    /// or delete a post.
    pub fn owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// A post joined with everything the feed and detail views render:
/// author, tags, and comments (newest first) with their authors.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub post: Post,
    pub author: User,
    pub tags: Vec<Tag>,
    pub comments: Vec<CommentWithAuthor>,
}
