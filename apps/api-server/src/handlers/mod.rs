//! HTTP request handlers.

pub mod auth;
pub mod comments;
pub mod health;
pub mod images;
pub mod posts;
pub mod tags;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .route("/tags", web::get().to(tags::index))
            .service(
                // Literal segments must register ahead of the {id} matcher.
                web::scope("/posts")
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::store))
                    .route("/new", web::get().to(posts::create))
                    .route("/images", web::post().to(images::upload))
                    .route("/images", web::delete().to(images::remove))
                    .route("/{id}", web::get().to(posts::show))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::destroy))
                    .route("/{id}/edit", web::get().to(posts::edit))
                    .route("/{id}/comments", web::get().to(comments::index))
                    .route("/{id}/comments", web::post().to(comments::store)),
            ),
    );
}

/// Canned repository stubs shared by the handler tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use quill_core::domain::{Comment, CommentWithAuthor, Post, PostDetail, Tag, User};
    use quill_core::error::RepoError;
    use quill_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};
    use quill_infra::storage::MemoryFileStore;

    use crate::middleware::auth::Identity;
    use crate::state::AppState;

    pub(crate) fn author() -> User {
        User::new(
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "hash".to_string(),
        )
    }

    pub(crate) fn identity_of(user: &User) -> Identity {
        Identity {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }

    pub(crate) fn detail_of(post: Post, author: User) -> PostDetail {
        PostDetail {
            post,
            author,
            tags: Vec::new(),
            comments: Vec::new(),
        }
    }

    #[derive(Default)]
    pub(crate) struct StubPosts {
        pub existing: Option<Post>,
        pub detail: Option<PostDetail>,
    }

    #[async_trait]
    impl PostRepository for StubPosts {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Post>, RepoError> {
            Ok(self.existing.clone())
        }

        async fn list_feed(&self) -> Result<Vec<PostDetail>, RepoError> {
            Ok(self.detail.clone().into_iter().collect())
        }

        async fn fetch_detail(&self, _id: Uuid) -> Result<Option<PostDetail>, RepoError> {
            Ok(self.detail.clone())
        }

        async fn create(&self, post: Post, _tag_ids: &[Uuid]) -> Result<Post, RepoError> {
            Ok(post)
        }

        async fn update(&self, post: Post, _tag_ids: &[Uuid]) -> Result<Post, RepoError> {
            Ok(post)
        }

        async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct StubComments {
        pub listed: Vec<CommentWithAuthor>,
        pub author: Option<User>,
    }

    #[async_trait]
    impl CommentRepository for StubComments {
        async fn list_for_post(
            &self,
            _post_id: Uuid,
        ) -> Result<Vec<CommentWithAuthor>, RepoError> {
            Ok(self.listed.clone())
        }

        async fn create(&self, comment: Comment) -> Result<CommentWithAuthor, RepoError> {
            let author = self.author.clone().unwrap_or_else(author);
            Ok(CommentWithAuthor { comment, author })
        }
    }

    #[derive(Default)]
    pub(crate) struct StubTags {
        pub tags: Vec<Tag>,
    }

    #[async_trait]
    impl TagRepository for StubTags {
        async fn list(&self) -> Result<Vec<Tag>, RepoError> {
            Ok(self.tags.clone())
        }

        async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
            Ok(self
                .tags
                .iter()
                .filter(|t| ids.contains(&t.id))
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub(crate) struct StubUsers {
        pub user: Option<User>,
    }

    #[async_trait]
    impl UserRepository for StubUsers {
        async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, RepoError> {
            Ok(self.user.clone())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(self.user.clone().filter(|u| u.email == email))
        }

        async fn create(&self, user: User) -> Result<User, RepoError> {
            Ok(user)
        }
    }

    /// State wired to empty stubs; tests swap in the pieces they need.
    pub(crate) fn stub_state() -> AppState {
        AppState {
            users: Arc::new(StubUsers::default()),
            posts: Arc::new(StubPosts::default()),
            comments: Arc::new(StubComments::default()),
            tags: Arc::new(StubTags::default()),
            files: Arc::new(MemoryFileStore::new()),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}
