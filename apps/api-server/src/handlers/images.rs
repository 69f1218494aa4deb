//! Image upload and delete, backing inline images in post bodies.
//!
//! The client pastes an image, posts the raw bytes here, and embeds the
//! returned URL as a markdown image link. Deleting takes the same public
//! URL and reduces it back to a storage path.

use actix_web::{HttpRequest, HttpResponse, web};
use mime::Mime;
use uuid::Uuid;

use quill_core::image::validate_image;
use quill_shared::dto::{DeleteImageRequest, ImageUploadResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// Bucket under the storage root where post images land.
const IMAGE_BUCKET: &str = "post-images";

/// POST /api/posts/images
pub async fn upload(
    state: web::Data<AppState>,
    identity: Identity,
    request_id: RequestId,
    req: HttpRequest,
    bytes: web::Bytes,
) -> AppResult<HttpResponse> {
    let content_type: Option<Mime> = req
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    let format = validate_image(content_type.as_ref(), &bytes).map_err(AppError::Validation)?;

    let name = format!("{}.{}", Uuid::new_v4(), format.extension());
    let path = state.files.store(IMAGE_BUCKET, &name, &bytes).await?;

    tracing::info!(
        request_id = %request_id.as_str(),
        user_id = %identity.user_id,
        path = %path,
        size = bytes.len(),
        "Image stored"
    );

    Ok(HttpResponse::Ok().json(ImageUploadResponse {
        url: format!("{}/storage/{}", state.public_base_url, path),
    }))
}

/// DELETE /api/posts/images
pub async fn remove(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<DeleteImageRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let path = storage_path_of(&req.url);

    state.files.delete(&path).await?;

    tracing::info!(user_id = %identity.user_id, path = %path, "Image deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Reduce a public image URL to its path under the storage root.
fn storage_path_of(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };
    let path = path.trim_start_matches('/');
    path.strip_prefix("storage/").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::http::header;
    use actix_web::test::TestRequest;
    use actix_web::web;

    use quill_core::ports::FileStore;
    use quill_infra::storage::MemoryFileStore;

    use super::*;
    use crate::handlers::testing::{author, identity_of, stub_state};

    fn png_bytes() -> web::Bytes {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);
        web::Bytes::from(bytes)
    }

    #[test]
    fn public_urls_reduce_to_storage_paths() {
        assert_eq!(
            storage_path_of("http://localhost:8080/storage/post-images/a.png"),
            "post-images/a.png"
        );
        assert_eq!(
            storage_path_of("/storage/post-images/a.png"),
            "post-images/a.png"
        );
        assert_eq!(storage_path_of("post-images/a.png"), "post-images/a.png");
    }

    #[actix_web::test]
    async fn upload_rejects_non_image_payload() {
        let state = web::Data::new(stub_state());
        let user = author();

        let req = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .to_http_request();

        let err = upload(
            state,
            identity_of(&user),
            RequestId("test".to_string()),
            req,
            web::Bytes::from_static(b"not an image"),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn upload_stores_png_and_returns_public_url() {
        let files = Arc::new(MemoryFileStore::new());
        let user = author();

        let mut state = stub_state();
        state.files = files.clone();
        let state = web::Data::new(state);

        let req = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .to_http_request();

        let response = upload(
            state,
            identity_of(&user),
            RequestId("test".to_string()),
            req,
            png_bytes(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: ImageUploadResponse = serde_json::from_slice(&body).unwrap();
        assert!(
            parsed
                .url
                .starts_with("http://localhost:8080/storage/post-images/")
        );
        assert!(parsed.url.ends_with(".png"));

        let stored = storage_path_of(&parsed.url);
        assert!(files.exists(&stored).await);
    }

    #[actix_web::test]
    async fn remove_missing_image_is_not_found() {
        let state = web::Data::new(stub_state());
        let user = author();

        let req = DeleteImageRequest {
            url: "http://localhost:8080/storage/post-images/gone.png".to_string(),
        };

        let err = remove(state, identity_of(&user), web::Json(req))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn remove_deletes_stored_image() {
        let files = Arc::new(MemoryFileStore::new());
        files
            .store(IMAGE_BUCKET, "a.png", b"bytes")
            .await
            .unwrap();

        let user = author();
        let mut state = stub_state();
        state.files = files.clone();
        let state = web::Data::new(state);

        let req = DeleteImageRequest {
            url: "http://localhost:8080/storage/post-images/a.png".to_string(),
        };

        let response = remove(state, identity_of(&user), web::Json(req))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        assert!(!files.exists("post-images/a.png").await);
    }
}
