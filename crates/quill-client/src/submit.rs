//! Submission coordinator: apply optimistic state, call out, reconcile.
//!
//! Each submission owns a temp id (comments) or marker (image uploads), so
//! any number of them can resolve out of order against the same thread or
//! draft. Shared state is locked only around the synchronous mutations,
//! never across the collaborator call.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use quill_shared::dto::{CommentData, UserData};

use crate::api::{ClientError, CommentBackend, ImageBackend, ImagePayload};
use crate::draft::DraftBuffer;
use crate::placeholder::{PlaceholderAllocator, TempId};
use crate::thread::PostThread;

/// Lifecycle of one submission slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing in flight; also the result of a submission that never
    /// started (blank input, no open thread).
    Idle,
    /// Optimistic state applied locally, request in flight.
    Optimistic,
    /// Authoritative result swapped in. Terminal.
    Confirmed,
    /// Optimistic state undone. Terminal.
    RolledBack,
}

/// Substituted for the upload marker when the upload fails. The marker is
/// always resolved, one way or the other.
pub const UPLOAD_FAILED_TEXT: &str = "Image upload failed. Please try again.";

/// Inline error shown under the comment box after a rollback.
pub const COMMENT_FAILED_TEXT: &str = "Could not post your comment. Please try again.";

/// The comment input under a post: text, focus and inline-error state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentComposer {
    input: String,
    focused: bool,
    error: Option<String>,
}

impl CommentComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// One in-flight comment submission: the slot's state machine plus the
/// submitted text, kept so a rollback can hand it back.
#[derive(Debug)]
pub struct CommentSubmission {
    post_id: Uuid,
    temp_id: TempId,
    body: String,
    state: SubmissionState,
}

impl CommentSubmission {
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn temp_id(&self) -> TempId {
        self.temp_id
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Apply the optimistic insert and clear the composer so the user can start
/// another comment while this one resolves.
///
/// Returns `None` without mutating anything when the input is blank or no
/// thread is open. The submitted body keeps its original whitespace; only
/// the blank check trims.
pub fn begin_comment(
    thread: &mut PostThread,
    composer: &mut CommentComposer,
    author: &UserData,
    alloc: &PlaceholderAllocator,
) -> Option<CommentSubmission> {
    if composer.input.trim().is_empty() {
        return None;
    }
    let post_id = thread.post_id()?;
    let body = composer.input.clone();
    let temp_id = thread.insert_optimistic(&body, author, alloc)?;

    composer.input.clear();
    composer.focused = false;
    composer.error = None;

    Some(CommentSubmission {
        post_id,
        temp_id,
        body,
        state: SubmissionState::Optimistic,
    })
}

/// Swap the provisional entry for the authoritative comment.
pub fn confirm_comment(
    thread: &mut PostThread,
    submission: &mut CommentSubmission,
    real: CommentData,
) {
    thread.replace_optimistic(submission.temp_id, real);
    submission.state = SubmissionState::Confirmed;
}

/// Undo the optimistic insert and hand the submitted text back to the
/// composer, focused and carrying an inline error, so the user can retry
/// without retyping.
pub fn roll_back_comment(
    thread: &mut PostThread,
    composer: &mut CommentComposer,
    submission: &mut CommentSubmission,
) {
    thread.remove_optimistic(submission.temp_id);
    composer.input = submission.body.clone();
    composer.focused = true;
    composer.error = Some(COMMENT_FAILED_TEXT.to_string());
    submission.state = SubmissionState::RolledBack;
}

/// Drive one comment through the full lifecycle against `backend`.
///
/// The optimistic insert is visible before the request is issued. Expiry of
/// `deadline` resolves as failure; there are no automatic retries.
pub async fn submit_comment(
    thread: &Mutex<PostThread>,
    composer: &Mutex<CommentComposer>,
    author: &UserData,
    alloc: &PlaceholderAllocator,
    backend: &dyn CommentBackend,
    deadline: Duration,
) -> SubmissionState {
    let begun = {
        let mut thread = thread.lock().await;
        let mut composer = composer.lock().await;
        begin_comment(&mut thread, &mut composer, author, alloc)
    };
    let Some(mut submission) = begun else {
        return SubmissionState::Idle;
    };

    let result = match timeout(
        deadline,
        backend.create_comment(submission.post_id, &submission.body),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout),
    };

    match result {
        Ok(real) => {
            let mut thread = thread.lock().await;
            confirm_comment(&mut thread, &mut submission, real);
            debug!(temp_id = %submission.temp_id(), "comment confirmed");
        }
        Err(error) => {
            warn!(%error, temp_id = %submission.temp_id(), "comment failed, rolling back");
            let mut thread = thread.lock().await;
            let mut composer = composer.lock().await;
            roll_back_comment(&mut thread, &mut composer, &mut submission);
        }
    }
    submission.state()
}

/// Insert an upload marker at the cursor, upload the image, then resolve
/// the marker to a markdown image link or to [`UPLOAD_FAILED_TEXT`].
///
/// If the draft no longer contains the marker when the upload resolves
/// (the user deleted it, or the draft was discarded), the resolution is
/// dropped silently.
pub async fn paste_image(
    draft: &Mutex<DraftBuffer>,
    alloc: &PlaceholderAllocator,
    backend: &dyn ImageBackend,
    image: ImagePayload,
    deadline: Duration,
) -> SubmissionState {
    let marker = alloc.marker();
    {
        let mut draft = draft.lock().await;
        draft.insert(&format!("\n{marker}\n"));
    }

    let result = if image.bytes.is_empty() {
        Err(ClientError::Api {
            status: 422,
            detail: "image is required".to_string(),
        })
    } else {
        match timeout(deadline, backend.upload_image(&image)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout),
        }
    };

    let (resolved, state) = match result {
        Ok(url) => {
            debug!(%marker, %url, "image upload confirmed");
            (format!("![ImageAlt]({url})"), SubmissionState::Confirmed)
        }
        Err(error) => {
            warn!(%error, %marker, "image upload failed");
            (UPLOAD_FAILED_TEXT.to_string(), SubmissionState::RolledBack)
        }
    };

    let mut draft = draft.lock().await;
    draft.resolve_marker(marker.as_str(), &format!("{resolved}\n\n"));
    state
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use quill_shared::dto::PostData;

    use super::*;
    use crate::thread::CommentEntry;

    fn author() -> UserData {
        UserData {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn open_thread(user: &UserData, comment_bodies: &[&str]) -> PostThread {
        let post_id = Uuid::new_v4();
        let now = Utc::now();
        let comments = comment_bodies
            .iter()
            .map(|body| CommentData {
                id: Uuid::new_v4(),
                post_id,
                user_id: user.id,
                body: body.to_string(),
                created_at: now,
                updated_at: now,
                user: user.clone(),
            })
            .collect();
        let mut thread = PostThread::new();
        thread.open(PostData {
            id: post_id,
            user_id: user.id,
            title: None,
            body: "post body".to_string(),
            image_path: None,
            created_at: now,
            updated_at: now,
            user: user.clone(),
            tags: Vec::new(),
            comments,
        });
        thread
    }

    fn composer_with(input: &str) -> CommentComposer {
        let mut composer = CommentComposer::new();
        composer.set_input(input);
        composer.focus();
        composer
    }

    fn jpeg_payload() -> ImagePayload {
        ImagePayload {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            content_type: "image/jpeg".to_string(),
        }
    }

    struct SucceedingBackend {
        author: UserData,
        delay: Duration,
    }

    impl SucceedingBackend {
        fn instant(author: &UserData) -> Self {
            Self {
                author: author.clone(),
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl CommentBackend for SucceedingBackend {
        async fn create_comment(
            &self,
            post_id: Uuid,
            body: &str,
        ) -> Result<CommentData, ClientError> {
            tokio::time::sleep(self.delay).await;
            let now = Utc::now();
            Ok(CommentData {
                id: Uuid::new_v4(),
                post_id,
                user_id: self.author.id,
                body: body.to_string(),
                created_at: now,
                updated_at: now,
                user: self.author.clone(),
            })
        }
    }

    struct RejectingBackend;

    #[async_trait]
    impl CommentBackend for RejectingBackend {
        async fn create_comment(
            &self,
            _post_id: Uuid,
            _body: &str,
        ) -> Result<CommentData, ClientError> {
            Err(ClientError::Api {
                status: 422,
                detail: "body is required".to_string(),
            })
        }
    }

    struct StalledBackend;

    #[async_trait]
    impl CommentBackend for StalledBackend {
        async fn create_comment(
            &self,
            _post_id: Uuid,
            _body: &str,
        ) -> Result<CommentData, ClientError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Err(ClientError::Transport("never reached".to_string()))
        }
    }

    struct UploadingBackend {
        url: &'static str,
        delay: Duration,
    }

    #[async_trait]
    impl ImageBackend for UploadingBackend {
        async fn upload_image(&self, _image: &ImagePayload) -> Result<String, ClientError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.url.to_string())
        }
    }

    struct FailingImageBackend;

    #[async_trait]
    impl ImageBackend for FailingImageBackend {
        async fn upload_image(&self, _image: &ImagePayload) -> Result<String, ClientError> {
            Err(ClientError::Transport("connection reset".to_string()))
        }
    }

    struct UntouchableImageBackend;

    #[async_trait]
    impl ImageBackend for UntouchableImageBackend {
        async fn upload_image(&self, _image: &ImagePayload) -> Result<String, ClientError> {
            panic!("backend must not be called for an empty payload");
        }
    }

    #[tokio::test]
    async fn round_trip_confirms_the_first_entry() {
        let user = author();
        let thread = Mutex::new(open_thread(&user, &["earlier comment"]));
        let composer = Mutex::new(composer_with("Hello world"));
        let alloc = PlaceholderAllocator::new();
        let backend = SucceedingBackend::instant(&user);

        let state = submit_comment(
            &thread,
            &composer,
            &user,
            &alloc,
            &backend,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, SubmissionState::Confirmed);
        let thread = thread.lock().await;
        let entries = thread.comments();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_optimistic());
        assert_eq!(entries[0].comment.body, "Hello world");
        assert_eq!(composer.lock().await.input(), "");
    }

    #[tokio::test]
    async fn rollback_restores_the_list_and_the_composer() {
        let user = author();
        let thread = Mutex::new(open_thread(&user, &["a", "b"]));
        let composer = Mutex::new(composer_with("Test"));
        let alloc = PlaceholderAllocator::new();
        let before: Vec<CommentEntry> = thread.lock().await.comments().to_vec();

        let state = submit_comment(
            &thread,
            &composer,
            &user,
            &alloc,
            &RejectingBackend,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, SubmissionState::RolledBack);
        assert_eq!(thread.lock().await.comments(), before.as_slice());
        let composer = composer.lock().await;
        assert_eq!(composer.input(), "Test");
        assert!(composer.is_focused());
        assert_eq!(composer.error(), Some(COMMENT_FAILED_TEXT));
    }

    #[tokio::test]
    async fn blank_input_never_submits() {
        let user = author();
        let thread = Mutex::new(open_thread(&user, &[]));
        let composer = Mutex::new(composer_with("   \n"));
        let alloc = PlaceholderAllocator::new();
        let backend = SucceedingBackend::instant(&user);

        let state = submit_comment(
            &thread,
            &composer,
            &user,
            &alloc,
            &backend,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, SubmissionState::Idle);
        assert!(thread.lock().await.comments().is_empty());
        // The unsubmitted input is kept.
        assert_eq!(composer.lock().await.input(), "   \n");
    }

    #[tokio::test]
    async fn closed_thread_never_submits() {
        let user = author();
        let thread = Mutex::new(PostThread::new());
        let composer = Mutex::new(composer_with("Hello"));
        let alloc = PlaceholderAllocator::new();
        let backend = SucceedingBackend::instant(&user);

        let state = submit_comment(
            &thread,
            &composer,
            &user,
            &alloc,
            &backend,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, SubmissionState::Idle);
    }

    #[tokio::test]
    async fn timeout_resolves_as_rollback() {
        let user = author();
        let thread = Mutex::new(open_thread(&user, &[]));
        let composer = Mutex::new(composer_with("slow"));
        let alloc = PlaceholderAllocator::new();

        let state = submit_comment(
            &thread,
            &composer,
            &user,
            &alloc,
            &StalledBackend,
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(state, SubmissionState::RolledBack);
        assert!(thread.lock().await.comments().is_empty());
        assert_eq!(composer.lock().await.input(), "slow");
    }

    #[tokio::test]
    async fn pasted_image_resolves_to_a_markdown_link() {
        let draft = Mutex::new(DraftBuffer::new("before "));
        let alloc = PlaceholderAllocator::new();
        let backend = UploadingBackend {
            url: "http://localhost/storage/post-images/x.jpg",
            delay: Duration::ZERO,
        };

        let state = paste_image(
            &draft,
            &alloc,
            &backend,
            jpeg_payload(),
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, SubmissionState::Confirmed);
        let draft = draft.lock().await;
        assert!(
            draft
                .text()
                .contains("![ImageAlt](http://localhost/storage/post-images/x.jpg)\n\n")
        );
        assert!(!draft.text().contains("[Uploading image..."));
    }

    #[tokio::test]
    async fn failed_upload_resolves_to_the_failure_message() {
        let draft = Mutex::new(DraftBuffer::new(""));
        let alloc = PlaceholderAllocator::new();

        let state = paste_image(
            &draft,
            &alloc,
            &FailingImageBackend,
            jpeg_payload(),
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, SubmissionState::RolledBack);
        let draft = draft.lock().await;
        assert!(draft.text().contains(UPLOAD_FAILED_TEXT));
        assert!(!draft.text().contains("[Uploading image..."));
    }

    #[tokio::test]
    async fn empty_payload_fails_without_calling_the_backend() {
        let draft = Mutex::new(DraftBuffer::new(""));
        let alloc = PlaceholderAllocator::new();
        let payload = ImagePayload {
            bytes: Vec::new(),
            content_type: "image/png".to_string(),
        };

        let state = paste_image(
            &draft,
            &alloc,
            &UntouchableImageBackend,
            payload,
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, SubmissionState::RolledBack);
        assert!(draft.lock().await.text().contains(UPLOAD_FAILED_TEXT));
    }

    #[tokio::test]
    async fn concurrent_uploads_resolve_their_own_markers() {
        let draft = Mutex::new(DraftBuffer::new(""));
        let alloc = PlaceholderAllocator::new();
        let slow = UploadingBackend {
            url: "http://cdn/slow.png",
            delay: Duration::from_millis(50),
        };
        let fast = UploadingBackend {
            url: "http://cdn/fast.png",
            delay: Duration::from_millis(1),
        };

        let (first, second) = tokio::join!(
            paste_image(&draft, &alloc, &slow, jpeg_payload(), Duration::from_secs(1)),
            paste_image(&draft, &alloc, &fast, jpeg_payload(), Duration::from_secs(1)),
        );

        assert_eq!(first, SubmissionState::Confirmed);
        assert_eq!(second, SubmissionState::Confirmed);
        let draft = draft.lock().await;
        assert!(draft.text().contains("![ImageAlt](http://cdn/slow.png)"));
        assert!(draft.text().contains("![ImageAlt](http://cdn/fast.png)"));
        assert!(!draft.text().contains("[Uploading image..."));
    }

    #[tokio::test]
    async fn late_completion_after_close_is_dropped() {
        let user = author();
        let thread = Mutex::new(open_thread(&user, &[]));
        let composer = Mutex::new(composer_with("going away"));
        let alloc = PlaceholderAllocator::new();
        let backend = SucceedingBackend {
            author: user.clone(),
            delay: Duration::from_millis(20),
        };

        // Close the thread while the request is still in flight. The
        // confirmation then finds no open thread and drops its result.
        let submitting = submit_comment(
            &thread,
            &composer,
            &user,
            &alloc,
            &backend,
            Duration::from_secs(1),
        );
        let closer = async {
            thread.lock().await.close();
        };
        let (state, ()) = tokio::join!(submitting, closer);

        assert_eq!(state, SubmissionState::Confirmed);
        let thread = thread.lock().await;
        assert!(!thread.is_open());
        assert!(thread.comments().is_empty());
    }
}
