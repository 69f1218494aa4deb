//! PostgreSQL tag repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::Tag;
use quill_core::error::RepoError;
use quill_core::ports::TagRepository;

use crate::database::entity::tag::{self, Entity as TagEntity};

/// PostgreSQL tag repository.
pub struct PostgresTagRepository {
    db: DbConn,
}

impl PostgresTagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let rows = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = TagEntity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
