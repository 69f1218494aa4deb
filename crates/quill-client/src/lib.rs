//! # Quill Client
//!
//! Client-side optimistic mutation engine. Mirrors what the UI does:
//! a submitted comment appears in the thread before the server confirms
//! it, and a pasted image holds its spot in the draft with a unique
//! marker until the upload resolves. Every optimistic change is either
//! reconciled with the authoritative server result or rolled back.

pub mod api;
pub mod draft;
pub mod placeholder;
pub mod submit;
pub mod thread;

pub use api::{ApiClient, ClientError, CommentBackend, ImageBackend, ImagePayload};
pub use placeholder::{Marker, PlaceholderAllocator, TempId};
pub use submit::SubmissionState;
