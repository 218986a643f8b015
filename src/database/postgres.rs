use async_trait::async_trait;

use super::{Data, Pool, Result};
use crate::schema::{
    Comment, CommentView, Follow, Group, NewComment, NewGroup, NewPost, NewUser, Post,
    PostChanges, PostFilter, PostView, User,
};
use crate::types::id::{PostId, UserId};

/// [`Data`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgData {
    pool: Pool,
}

impl PgData {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Data for PgData {
    async fn create_user(&self, user: &NewUser<'_>) -> Result<Option<User>> {
        let mut conn = self.pool.get().await?;
        User::insert(&mut conn, user).await
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let mut conn = self.pool.get().await?;
        User::by_id(&mut conn, id).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.pool.get().await?;
        User::by_username(&mut conn, username).await
    }

    async fn create_group(&self, group: &NewGroup<'_>) -> Result<Option<Group>> {
        let mut conn = self.pool.get().await?;
        Group::insert(&mut conn, group).await
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let mut conn = self.pool.get().await?;
        Group::by_slug(&mut conn, slug).await
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let mut conn = self.pool.get().await?;
        Group::list(&mut conn).await
    }

    async fn create_post(&self, post: &NewPost<'_>) -> Result<Post> {
        let mut conn = self.pool.get().await?;
        Post::insert(&mut conn, post).await
    }

    async fn update_post(&self, id: PostId, changes: &PostChanges<'_>) -> Result<Option<Post>> {
        let mut conn = self.pool.get().await?;
        Post::update(&mut conn, id, changes).await
    }

    async fn find_post(&self, author: &str, id: PostId) -> Result<Option<PostView>> {
        let mut conn = self.pool.get().await?;
        Post::find_view(&mut conn, author, id).await
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<u64> {
        let mut conn = self.pool.get().await?;
        Post::count(&mut conn, filter).await
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostView>> {
        let mut conn = self.pool.get().await?;
        Post::list(&mut conn, filter, offset, limit).await
    }

    async fn create_comment(&self, comment: &NewComment<'_>) -> Result<Comment> {
        let mut conn = self.pool.get().await?;
        Comment::insert(&mut conn, comment).await
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<CommentView>> {
        let mut conn = self.pool.get().await?;
        Comment::list_for_post(&mut conn, post_id).await
    }

    async fn follow(&self, user_id: UserId, author_id: UserId) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        Follow::follow(&mut conn, user_id, author_id).await
    }

    async fn unfollow(&self, user_id: UserId, author_id: UserId) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        Follow::unfollow(&mut conn, user_id, author_id).await
    }

    async fn is_following(&self, user_id: UserId, author_id: UserId) -> Result<bool> {
        let mut conn = self.pool.get().await?;
        Follow::exists(&mut conn, user_id, author_id).await
    }

    async fn count_followers(&self, author_id: UserId) -> Result<u64> {
        let mut conn = self.pool.get().await?;
        Follow::count_followers(&mut conn, author_id).await
    }

    async fn count_following(&self, user_id: UserId) -> Result<u64> {
        let mut conn = self.pool.get().await?;
        Follow::count_following(&mut conn, user_id).await
    }
}
