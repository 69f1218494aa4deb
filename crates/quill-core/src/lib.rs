//! # Quill Core
//!
//! The domain layer of the quill posting service.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, validation rules, tag-set semantics, and the port traits the
//! infrastructure must implement.

pub mod domain;
pub mod error;
pub mod image;
pub mod ports;
pub mod tag_sync;
pub mod validate;

pub use error::DomainError;
