//! PostgreSQL post repository with eager feed assembly.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use quill_core::domain::{CommentWithAuthor, Post, PostDetail, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;
use quill_core::tag_sync;

use crate::database::entity::comment::{self, Entity as CommentEntity};
use crate::database::entity::post::{self, Entity as PostEntity};
use crate::database::entity::post_tag::{self, Entity as PostTagEntity};
use crate::database::entity::tag::{self, Entity as TagEntity};
use crate::database::entity::user::{self, Entity as UserEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Attach authors, tags and comments to already-fetched post rows.
    ///
    /// Runs one batched query per related table instead of one per post.
    /// Rows pointing at a missing author are skipped with a warning
    /// instead of failing the whole page.
    async fn assemble_details(
        &self,
        posts: Vec<post::Model>,
    ) -> Result<Vec<PostDetail>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

        let comments = CommentEntity::find()
            .filter(comment::Column::PostId.is_in(post_ids.clone()))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let mut author_ids: Vec<Uuid> = Vec::new();
        let mut seen = HashSet::new();
        for id in posts
            .iter()
            .map(|p| p.user_id)
            .chain(comments.iter().map(|c| c.user_id))
        {
            if seen.insert(id) {
                author_ids.push(id);
            }
        }

        let users: HashMap<Uuid, User> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let mut tag_ids: Vec<Uuid> = Vec::new();
        let mut seen_tags = HashSet::new();
        for link in &links {
            if seen_tags.insert(link.tag_id) {
                tag_ids.push(link.tag_id);
            }
        }

        let tags: HashMap<Uuid, Tag> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            TagEntity::find()
                .filter(tag::Column::Id.is_in(tag_ids))
                .all(&self.db)
                .await
                .map_err(|e| RepoError::Query(e.to_string()))?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        let mut comments_by_post: HashMap<Uuid, Vec<CommentWithAuthor>> = HashMap::new();
        for row in comments {
            let Some(author) = users.get(&row.user_id) else {
                tracing::warn!(comment_id = %row.id, "Skipping comment with missing author");
                continue;
            };
            comments_by_post
                .entry(row.post_id)
                .or_default()
                .push(CommentWithAuthor {
                    author: author.clone(),
                    comment: row.into(),
                });
        }

        let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(found) = tags.get(&link.tag_id) {
                tags_by_post
                    .entry(link.post_id)
                    .or_default()
                    .push(found.clone());
            }
        }

        let mut details = Vec::with_capacity(posts.len());
        for row in posts {
            let Some(author) = users.get(&row.user_id) else {
                tracing::warn!(post_id = %row.id, "Skipping post with missing author");
                continue;
            };
            details.push(PostDetail {
                author: author.clone(),
                tags: tags_by_post.remove(&row.id).unwrap_or_default(),
                comments: comments_by_post.remove(&row.id).unwrap_or_default(),
                post: row.into(),
            });
        }

        Ok(details)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn list_feed(&self) -> Result<Vec<PostDetail>, RepoError> {
        tracing::debug!("Loading post feed");

        let posts = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        self.assemble_details(posts).await
    }

    async fn fetch_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let Some(row) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut details = self.assemble_details(vec![row]).await?;
        Ok(details.pop())
    }

    async fn create(&self, new_post: Post, tag_ids: &[Uuid]) -> Result<Post, RepoError> {
        // An empty current set turns the plan into deduped attaches.
        let plan = tag_sync::plan(&[], tag_ids);

        let active: post::ActiveModel = new_post.into();
        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if !plan.attach.is_empty() {
            let links = plan.attach.iter().map(|tag_id| post_tag::ActiveModel {
                post_id: Set(model.id),
                tag_id: Set(*tag_id),
            });
            PostTagEntity::insert_many(links)
                .exec(&self.db)
                .await
                .map_err(|e| RepoError::Query(e.to_string()))?;
        }

        Ok(model.into())
    }

    async fn update(&self, edited: Post, tag_ids: &[Uuid]) -> Result<Post, RepoError> {
        let post_id = edited.id;

        let current: Vec<Uuid> = PostTagEntity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();
        let plan = tag_sync::plan(&current, tag_ids);

        let active: post::ActiveModel = edited.into();
        let model = active.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => RepoError::Query(other.to_string()),
        })?;

        if !plan.detach.is_empty() {
            PostTagEntity::delete_many()
                .filter(post_tag::Column::PostId.eq(post_id))
                .filter(post_tag::Column::TagId.is_in(plan.detach.iter().copied()))
                .exec(&self.db)
                .await
                .map_err(|e| RepoError::Query(e.to_string()))?;
        }

        if !plan.attach.is_empty() {
            let links = plan.attach.iter().map(|tag_id| post_tag::ActiveModel {
                post_id: Set(post_id),
                tag_id: Set(*tag_id),
            });
            PostTagEntity::insert_many(links)
                .exec(&self.db)
                .await
                .map_err(|e| RepoError::Query(e.to_string()))?;
        }

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
