//! Post CRUD handlers.
//!
//! Every route requires authentication. Mutating routes additionally
//! require ownership: only the author may update or delete a post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::validate::validate_post;
use quill_shared::dto::{
    CreatePostForm, EditPostForm, FeedResponse, PostData, PostResponse, StorePostRequest, TagData,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts
pub async fn index(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_feed().await?;

    Ok(HttpResponse::Ok().json(FeedResponse {
        posts: posts.into_iter().map(PostData::from).collect(),
    }))
}

/// GET /api/posts/new
pub async fn create(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;

    Ok(HttpResponse::Ok().json(CreatePostForm {
        tags: tags.into_iter().map(TagData::from).collect(),
    }))
}

/// POST /api/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<StorePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let title = normalize_title(req.title);
    validate_post(title.as_deref(), &req.body).map_err(AppError::Validation)?;
    ensure_tags_exist(&state, &req.tags).await?;

    let post = Post::new(identity.user_id, title, req.body);
    let created = state.posts.create(post, &req.tags).await?;

    tracing::info!(post_id = %created.id, user_id = %identity.user_id, "Post created");

    let detail = state
        .posts
        .fetch_detail(created.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("post {} vanished after create", created.id)))?;

    Ok(HttpResponse::Created().json(PostResponse {
        post: detail.into(),
    }))
}

/// GET /api/posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let detail = state
        .posts
        .fetch_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    Ok(HttpResponse::Ok().json(PostResponse {
        post: detail.into(),
    }))
}

/// GET /api/posts/{id}/edit
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let detail = state
        .posts
        .fetch_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    if !detail.post.owned_by(identity.user_id) {
        return Err(AppError::Forbidden);
    }

    let tags = state.tags.list().await?;

    Ok(HttpResponse::Ok().json(EditPostForm {
        post: detail.into(),
        tags: tags.into_iter().map(TagData::from).collect(),
    }))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<StorePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    if !post.owned_by(identity.user_id) {
        return Err(AppError::Forbidden);
    }

    let title = normalize_title(req.title);
    validate_post(title.as_deref(), &req.body).map_err(AppError::Validation)?;
    ensure_tags_exist(&state, &req.tags).await?;

    post.edit(title, req.body);
    state.posts.update(post, &req.tags).await?;

    tracing::info!(post_id = %id, user_id = %identity.user_id, "Post updated");

    let detail = state
        .posts
        .fetch_detail(id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("post {id} vanished after update")))?;

    Ok(HttpResponse::Ok().json(PostResponse {
        post: detail.into(),
    }))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;

    if !post.owned_by(identity.user_id) {
        return Err(AppError::Forbidden);
    }

    state.posts.delete(id).await?;

    tracing::info!(post_id = %id, user_id = %identity.user_id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// A blank or whitespace-only title is treated as absent.
fn normalize_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Every submitted tag must exist. Duplicates are tolerated.
async fn ensure_tags_exist(state: &AppState, tag_ids: &[Uuid]) -> AppResult<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    let mut unique = tag_ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let known = state.tags.find_by_ids(&unique).await?;
    if known.len() != unique.len() {
        return Err(AppError::Validation(vec![
            "one or more selected tags do not exist".to_string(),
        ]));
    }

    Ok(())
}
