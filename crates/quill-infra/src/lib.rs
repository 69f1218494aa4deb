//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the SeaORM persistence layer, file storage
//! backends, and the JWT + Argon2 authentication services.

pub mod auth;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, DatabaseConnections};
pub use storage::{DiskFileStore, MemoryFileStore};
