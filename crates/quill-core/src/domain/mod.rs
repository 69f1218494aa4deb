//! Domain entities - the core business objects.

mod comment;
mod post;
mod tag;
mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use post::{Post, PostDetail};
pub use tag::Tag;
pub use user::User;
