//! Database connection management and SeaORM repositories.

mod connections;

pub mod entity;
pub mod repo;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};
