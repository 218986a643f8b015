use async_trait::async_trait;
use std::fmt::Debug;

use super::Result;
use crate::schema::{
    Comment, CommentView, Group, NewComment, NewGroup, NewPost, NewUser, Post, PostChanges,
    PostFilter, PostView, User,
};
use crate::types::id::{PostId, UserId};

/// Everything the web layer needs from persistent storage.
///
/// [`PgData`](super::PgData) talks to Postgres while
/// [`MemoryData`](super::MemoryData) keeps everything in memory
/// for tests and local tinkering.
#[async_trait]
pub trait Data: Debug + Send + Sync {
    /// Returns `None` if the username is already taken.
    async fn create_user(&self, user: &NewUser<'_>) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Returns `None` if the slug is already taken.
    async fn create_group(&self, group: &NewGroup<'_>) -> Result<Option<Group>>;

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>>;

    async fn list_groups(&self) -> Result<Vec<Group>>;

    async fn create_post(&self, post: &NewPost<'_>) -> Result<Post>;

    async fn update_post(&self, id: PostId, changes: &PostChanges<'_>) -> Result<Option<Post>>;

    /// Finds a post only if it belongs to the user named `author`.
    async fn find_post(&self, author: &str, id: PostId) -> Result<Option<PostView>>;

    async fn count_posts(&self, filter: PostFilter) -> Result<u64>;

    /// Lists posts newest first.
    async fn list_posts(&self, filter: PostFilter, offset: u64, limit: u64)
        -> Result<Vec<PostView>>;

    async fn create_comment(&self, comment: &NewComment<'_>) -> Result<Comment>;

    /// Lists comments oldest first.
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<CommentView>>;

    /// Returns `false` if `user_id` already follows `author_id`.
    async fn follow(&self, user_id: UserId, author_id: UserId) -> Result<bool>;

    /// Returns `false` if there was nothing to unfollow.
    async fn unfollow(&self, user_id: UserId, author_id: UserId) -> Result<bool>;

    async fn is_following(&self, user_id: UserId, author_id: UserId) -> Result<bool>;

    async fn count_followers(&self, author_id: UserId) -> Result<u64>;

    async fn count_following(&self, user_id: UserId) -> Result<u64>;
}
