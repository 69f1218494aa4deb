//! HTTP collaborators as the client engine sees them.
//!
//! The engine depends on the two narrow traits below; [`ApiClient`] is the
//! reqwest-backed implementation speaking the server's JSON surface.

use async_trait::async_trait;
use reqwest::header;
use uuid::Uuid;

use quill_shared::ErrorResponse;
use quill_shared::dto::{
    AuthResponse, CommentCreatedResponse, CommentData, FeedResponse, ImageUploadResponse,
    LoginRequest, PostData, PostResponse, StoreCommentRequest,
};

/// Failure of a collaborator call, seen from the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("api error ({status}): {detail}")]
    Api { status: u16, detail: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Comment persistence collaborator.
#[async_trait]
pub trait CommentBackend: Send + Sync {
    /// Create a comment under `post_id` and return the authoritative record.
    async fn create_comment(&self, post_id: Uuid, body: &str) -> Result<CommentData, ClientError>;
}

/// Image storage collaborator.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Upload a pasted image and return its public URL.
    async fn upload_image(&self, image: &ImagePayload) -> Result<String, ClientError>;
}

/// Raw pasted image bytes plus the MIME type the clipboard reported.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// API client for the posting server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Use `token` as the bearer credential on subsequent requests.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn api_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let detail = match response.json::<ErrorResponse>().await {
            Ok(problem) => problem.detail.unwrap_or(problem.title),
            Err(_) => "unreadable error body".to_string(),
        };
        ClientError::Api { status, detail }
    }

    /// Exchange credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .request(self.http.post(self.url("/api/auth/login")))
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// The post feed, newest first, with authors, tags and comments.
    pub async fn fetch_feed(&self) -> Result<Vec<PostData>, ClientError> {
        let response = self
            .request(self.http.get(self.url("/api/posts")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let feed: FeedResponse = response.json().await?;
        Ok(feed.posts)
    }

    /// One post with comments, the fetch behind the post dialog.
    pub async fn fetch_post(&self, id: Uuid) -> Result<PostData, ClientError> {
        let response = self
            .request(self.http.get(self.url(&format!("/api/posts/{id}"))))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let body: PostResponse = response.json().await?;
        Ok(body.post)
    }
}

#[async_trait]
impl CommentBackend for ApiClient {
    async fn create_comment(&self, post_id: Uuid, body: &str) -> Result<CommentData, ClientError> {
        let response = self
            .request(
                self.http
                    .post(self.url(&format!("/api/posts/{post_id}/comments"))),
            )
            .json(&StoreCommentRequest {
                body: body.to_string(),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let created: CommentCreatedResponse = response.json().await?;
        Ok(created.comment)
    }
}

#[async_trait]
impl ImageBackend for ApiClient {
    async fn upload_image(&self, image: &ImagePayload) -> Result<String, ClientError> {
        let response = self
            .request(self.http.post(self.url("/api/posts/images")))
            .header(header::CONTENT_TYPE, image.content_type.as_str())
            .body(image.bytes.clone())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let uploaded: ImageUploadResponse = response.json().await?;
        Ok(uploaded.url)
    }
}
