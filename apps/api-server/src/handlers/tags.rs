//! Tag listing.

use actix_web::{HttpResponse, web};

use quill_shared::dto::TagData;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags
///
/// Requires no authentication. Returns every tag as a bare array,
/// ordered by name.
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;
    let tags: Vec<TagData> = tags.into_iter().map(TagData::from).collect();

    Ok(HttpResponse::Ok().json(tags))
}
