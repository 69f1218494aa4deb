//! PostgreSQL repository implementations.

mod comments;
mod posts;
mod tags;
mod users;

pub use comments::PostgresCommentRepository;
pub use posts::PostgresPostRepository;
pub use tags::PostgresTagRepository;
pub use users::PostgresUserRepository;

pub(crate) use users::mask_email;
