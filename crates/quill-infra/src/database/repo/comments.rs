//! PostgreSQL comment repository.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::{Comment, CommentWithAuthor, User};
use quill_core::error::RepoError;
use quill_core::ports::CommentRepository;

use crate::database::entity::comment::{self, Entity as CommentEntity};
use crate::database::entity::user::{self, Entity as UserEntity};

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = Vec::new();
        let mut seen = HashSet::new();
        for row in &rows {
            if seen.insert(row.user_id) {
                author_ids.push(row.user_id);
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

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(author) = users.get(&row.user_id) else {
                tracing::warn!(comment_id = %row.id, "Skipping comment with missing author");
                continue;
            };
            out.push(CommentWithAuthor {
                author: author.clone(),
                comment: row.into(),
            });
        }

        Ok(out)
    }

    async fn create(&self, new_comment: Comment) -> Result<CommentWithAuthor, RepoError> {
        let active: comment::ActiveModel = new_comment.into();
        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let author = UserEntity::find_by_id(model.user_id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?
            .ok_or_else(|| {
                RepoError::Query(format!(
                    "author {} missing for comment {}",
                    model.user_id, model.id
                ))
            })?;

        Ok(CommentWithAuthor {
            author: author.into(),
            comment: model.into(),
        })
    }
}
