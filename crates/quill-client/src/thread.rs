//! Optimistic comment list for one open post thread.

use chrono::Utc;
use uuid::Uuid;

use quill_shared::dto::{CommentData, PostData, UserData};

use crate::placeholder::{PlaceholderAllocator, TempId};

/// One rendered comment row. `pending` holds the temporary id while the
/// entry awaits server confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentEntry {
    pub comment: CommentData,
    pub pending: Option<TempId>,
}

impl CommentEntry {
    pub fn is_optimistic(&self) -> bool {
        self.pending.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ThreadState {
    post: PostData,
    comments: Vec<CommentEntry>,
}

/// Client-side view of one post and its comments, newest first.
///
/// The thread may be closed, like a dismissed post dialog. Every mutation
/// is a checked no-op in that case, so a request that completes after the
/// view went away lands harmlessly.
#[derive(Debug, Default)]
pub struct PostThread {
    state: Option<ThreadState>,
}

impl PostThread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fetched post, replacing whatever was open before.
    pub fn open(&mut self, mut post: PostData) {
        let comments = post
            .comments
            .drain(..)
            .map(|comment| CommentEntry {
                comment,
                pending: None,
            })
            .collect();
        self.state = Some(ThreadState { post, comments });
    }

    /// Drop the loaded post. In-flight completions against the old state
    /// resolve as no-ops.
    pub fn close(&mut self) {
        self.state = None;
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn post(&self) -> Option<&PostData> {
        self.state.as_ref().map(|state| &state.post)
    }

    pub fn post_id(&self) -> Option<Uuid> {
        self.state.as_ref().map(|state| state.post.id)
    }

    /// Comments in render order, newest first.
    pub fn comments(&self) -> &[CommentEntry] {
        self.state
            .as_ref()
            .map(|state| state.comments.as_slice())
            .unwrap_or(&[])
    }

    /// Prepend a provisional comment and return its temporary id, or `None`
    /// when no post is open (nothing is mutated in that case).
    pub fn insert_optimistic(
        &mut self,
        body: &str,
        author: &UserData,
        alloc: &PlaceholderAllocator,
    ) -> Option<TempId> {
        let state = self.state.as_mut()?;
        let temp_id = alloc.temp_id();
        let now = Utc::now();
        let comment = CommentData {
            // No persisted id yet; the row is keyed by its temp id until
            // confirmed.
            id: Uuid::nil(),
            post_id: state.post.id,
            user_id: author.id,
            body: body.to_string(),
            created_at: now,
            updated_at: now,
            user: author.clone(),
        };
        state.comments.insert(
            0,
            CommentEntry {
                comment,
                pending: Some(temp_id),
            },
        );
        Some(temp_id)
    }

    /// Swap the provisional entry for the authoritative record, keeping its
    /// list position. When the temp id is gone the record is appended
    /// instead, so a confirmed comment is never dropped.
    pub fn replace_optimistic(&mut self, temp_id: TempId, real: CommentData) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let confirmed = CommentEntry {
            comment: real,
            pending: None,
        };
        match state
            .comments
            .iter_mut()
            .find(|entry| entry.pending == Some(temp_id))
        {
            Some(entry) => *entry = confirmed,
            None => state.comments.push(confirmed),
        }
    }

    /// Remove the provisional entry. An unknown temp id is a defined no-op.
    pub fn remove_optimistic(&mut self, temp_id: TempId) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.comments.retain(|entry| entry.pending != Some(temp_id));
    }
}
