//! Data Transfer Objects - request/response types for the API.
//!
//! These mirror the JSON bodies on the wire field for field. The client
//! engine builds its optimistic entries out of the same types, so a
//! confirmed record can be swapped in without any reshaping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{CommentWithAuthor, PostDetail, Tag, User};

/// Public view of a user. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// A selectable tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagData {
    pub id: Uuid,
    pub name: String,
}

impl From<Tag> for TagData {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// A comment with its author attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentData {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserData,
}

impl From<CommentWithAuthor> for CommentData {
    fn from(entry: CommentWithAuthor) -> Self {
        let CommentWithAuthor { comment, author } = entry;
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            body: comment.body,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            user: author.into(),
        }
    }
}

/// A post with author, tags and comments eagerly attached.
///
/// Comments are ordered newest first, which is the order the feed and the
/// post dialog render them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub body: String,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserData,
    pub tags: Vec<TagData>,
    pub comments: Vec<CommentData>,
}

impl From<PostDetail> for PostData {
    fn from(detail: PostDetail) -> Self {
        let PostDetail {
            post,
            author,
            tags,
            comments,
        } = detail;
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
            image_path: post.image_path,
            created_at: post.created_at,
            updated_at: post.updated_at,
            user: author.into(),
            tags: tags.into_iter().map(TagData::from).collect(),
            comments: comments.into_iter().map(CommentData::from).collect(),
        }
    }
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing an authentication token and its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserData,
}

/// Create or update a post. `tags` replaces the post's tag set exactly;
/// omitting it clears every tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Create a comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCommentRequest {
    pub body: String,
}

/// Body of a successful comment creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentCreatedResponse {
    pub comment: CommentData,
    pub message: String,
}

/// Body of a single-post fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: PostData,
}

/// Body of the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub posts: Vec<PostData>,
}

/// Data backing the post-create form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostForm {
    pub tags: Vec<TagData>,
}

/// Data backing the post-edit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPostForm {
    pub post: PostData,
    pub tags: Vec<TagData>,
}

/// Body of a successful image upload. The URL is public and ready to embed
/// as a markdown image link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUploadResponse {
    pub url: String,
}

/// Delete an uploaded image by its public URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteImageRequest {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_post_request_defaults_missing_tags_to_empty() {
        let req: StorePostRequest = serde_json::from_str(r#"{"body":"hello"}"#).unwrap();

        assert_eq!(req.title, None);
        assert_eq!(req.body, "hello");
        assert!(req.tags.is_empty());
    }

    #[test]
    fn comment_data_carries_author() {
        let author = User::new("Ada".into(), "ada@example.com".into(), "hash".into());
        let comment =
            quill_core::domain::Comment::new(Uuid::new_v4(), author.id, "First!".into());
        let expected_id = comment.id;

        let data = CommentData::from(CommentWithAuthor {
            comment,
            author: author.clone(),
        });

        assert_eq!(data.id, expected_id);
        assert_eq!(data.user_id, author.id);
        assert_eq!(data.user.name, "Ada");
        assert_eq!(data.body, "First!");
    }
}
