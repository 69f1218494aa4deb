//! # Quill Shared
//!
//! Wire types shared between the API server and the client engine.
//! Everything here serializes to the exact JSON the HTTP surface speaks.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
