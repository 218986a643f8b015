//! Row types of the yatube database and the queries that operate
//! on them. Every query takes a plain [`Connection`] so that callers
//! decide whether it runs inside a transaction or not.
//!
//! [`Connection`]: crate::database::Connection
mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentView, NewComment};
pub use follow::Follow;
pub use group::{Group, GroupRef, NewGroup};
pub use post::{NewPost, Post, PostChanges, PostFilter, PostView};
pub use user::{Author, NewUser, User};

/// Postgres hands out `COUNT(*)` as a signed integer.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
