//! Comment handlers.
//!
//! Comments hang off a post and are immutable once created. The create
//! response carries the comment with its author attached, so the client
//! can swap it straight into the rendered list.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Comment;
use quill_core::validate::validate_comment;
use quill_shared::dto::{CommentCreatedResponse, CommentData, StoreCommentRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts/{id}/comments
pub async fn index(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    ensure_post_exists(&state, post_id).await?;

    let comments = state.comments.list_for_post(post_id).await?;
    let comments: Vec<CommentData> = comments.into_iter().map(CommentData::from).collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// POST /api/posts/{id}/comments
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<StoreCommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    ensure_post_exists(&state, post_id).await?;
    validate_comment(&req.body).map_err(AppError::Validation)?;

    let comment = Comment::new(post_id, identity.user_id, req.body);
    let created = state.comments.create(comment).await?;

    tracing::info!(
        comment_id = %created.comment.id,
        post_id = %post_id,
        user_id = %identity.user_id,
        "Comment posted"
    );

    Ok(HttpResponse::Created().json(CommentCreatedResponse {
        comment: created.into(),
        message: "Comment added successfully.".to_string(),
    }))
}

async fn ensure_post_exists(state: &AppState, post_id: Uuid) -> AppResult<()> {
    state
        .posts
        .find_by_id(post_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))
}
