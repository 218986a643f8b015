use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Data, Result};
use crate::schema::{
    Author, Comment, CommentView, Follow, Group, GroupRef, NewComment, NewGroup, NewPost, NewUser,
    Post, PostChanges, PostFilter, PostView, User,
};
use crate::types::id::{marker::Marker, Id, PostId, UserId};

/// [`Data`] kept entirely in memory. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryData {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

impl MemoryData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id<T: Marker>(len: usize) -> Id<T> {
    Id::new(len as u64 + 1)
}

impl State {
    fn matches(&self, post: &Post, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(id) => post.group_id == Some(id),
            PostFilter::Author(id) => post.author_id == id,
            PostFilter::FollowedBy(id) => self
                .follows
                .iter()
                .any(|f| f.user_id == id && f.author_id == post.author_id),
        }
    }

    fn author(&self, id: UserId) -> Option<Author> {
        self.users.iter().find(|u| u.id == id).map(Author::from)
    }

    fn view(&self, post: &Post) -> Option<PostView> {
        let group = post
            .group_id
            .and_then(|id| self.groups.iter().find(|g| g.id == id))
            .map(GroupRef::from);

        let comments_count = self
            .comments
            .iter()
            .filter(|c| c.post_id == post.id)
            .count() as u64;

        Some(PostView {
            id: post.id,
            text: post.text.clone(),
            image: post.image.clone(),
            created_at: post.created_at,
            author: self.author(post.author_id)?,
            group,
            comments_count,
        })
    }
}

#[async_trait]
impl Data for MemoryData {
    async fn create_user(&self, user: &NewUser<'_>) -> Result<Option<User>> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Ok(None);
        }

        let user = User {
            id: next_id(state.users.len()),
            username: user.username.to_string(),
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            email: user.email.map(ToString::to_string),
            password_hash: user.password_hash.to_string(),
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(Some(user))
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_group(&self, group: &NewGroup<'_>) -> Result<Option<Group>> {
        let mut state = self.state.write().await;
        if state.groups.iter().any(|g| g.slug == group.slug) {
            return Ok(None);
        }

        let group = Group {
            id: next_id(state.groups.len()),
            title: group.title.to_string(),
            slug: group.slug.to_string(),
            description: group.description.to_string(),
        };
        state.groups.push(group.clone());
        Ok(Some(group))
    }

    async fn find_group_by_slug(&self, slug: &str) -> Result<Option<Group>> {
        let state = self.state.read().await;
        Ok(state.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn list_groups(&self) -> Result<Vec<Group>> {
        let state = self.state.read().await;
        let mut groups = state.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    async fn create_post(&self, post: &NewPost<'_>) -> Result<Post> {
        let mut state = self.state.write().await;
        let post = Post {
            id: next_id(state.posts.len()),
            text: post.text.to_string(),
            image: post.image.map(ToString::to_string),
            author_id: post.author_id,
            group_id: post.group_id,
            created_at: Utc::now(),
        };
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: PostId, changes: &PostChanges<'_>) -> Result<Option<Post>> {
        let mut state = self.state.write().await;
        let Some(post) = state.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        post.text = changes.text.to_string();
        post.image = changes.image.map(ToString::to_string);
        post.group_id = changes.group_id;
        Ok(Some(post.clone()))
    }

    async fn find_post(&self, author: &str, id: PostId) -> Result<Option<PostView>> {
        let state = self.state.read().await;
        let view = state
            .posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| state.view(p))
            .filter(|v| v.author.username == author);

        Ok(view)
    }

    async fn count_posts(&self, filter: PostFilter) -> Result<u64> {
        let state = self.state.read().await;
        let count = state
            .posts
            .iter()
            .filter(|p| state.matches(p, filter))
            .count();

        Ok(count as u64)
    }

    async fn list_posts(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostView>> {
        let state = self.state.read().await;
        let mut posts = state
            .posts
            .iter()
            .filter(|p| state.matches(p, filter))
            .collect::<Vec<_>>();

        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(posts
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|p| state.view(p))
            .collect())
    }

    async fn create_comment(&self, comment: &NewComment<'_>) -> Result<Comment> {
        let mut state = self.state.write().await;
        let comment = Comment {
            id: next_id(state.comments.len()),
            post_id: comment.post_id,
            author_id: comment.author_id,
            text: comment.text.to_string(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: PostId) -> Result<Vec<CommentView>> {
        let state = self.state.read().await;
        let mut comments = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                Some(CommentView {
                    id: c.id,
                    text: c.text.clone(),
                    created_at: c.created_at,
                    author: state.author(c.author_id)?,
                })
            })
            .collect::<Vec<_>>();

        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn follow(&self, user_id: UserId, author_id: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        let exists = state
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id);

        if exists {
            return Ok(false);
        }

        let follow = Follow {
            id: next_id(state.follows.len()),
            user_id,
            author_id,
        };
        state.follows.push(follow);
        Ok(true)
    }

    async fn unfollow(&self, user_id: UserId, author_id: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.follows.len();
        state
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));

        Ok(state.follows.len() < before)
    }

    async fn is_following(&self, user_id: UserId, author_id: UserId) -> Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }

    async fn count_followers(&self, author_id: UserId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.follows.iter().filter(|f| f.author_id == author_id).count() as u64)
    }

    async fn count_following(&self, user_id: UserId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.follows.iter().filter(|f| f.user_id == user_id).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser<'_> {
        NewUser {
            username,
            first_name: "",
            last_name: "",
            email: None,
            password_hash: "!",
        }
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let data = MemoryData::new();
        assert!(data.create_user(&new_user("auth")).await.unwrap().is_some());
        assert!(data.create_user(&new_user("auth")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_follow_feed_and_counts() {
        let data = MemoryData::new();
        let reader = data.create_user(&new_user("reader")).await.unwrap().unwrap();
        let author = data.create_user(&new_user("author")).await.unwrap().unwrap();
        let other = data.create_user(&new_user("other")).await.unwrap().unwrap();

        for (user, text) in [(&author, "followed"), (&other, "not followed")] {
            data.create_post(&NewPost {
                text,
                image: None,
                author_id: user.id,
                group_id: None,
            })
            .await
            .unwrap();
        }

        assert!(data.follow(reader.id, author.id).await.unwrap());
        assert!(!data.follow(reader.id, author.id).await.unwrap());
        assert_eq!(data.count_following(reader.id).await.unwrap(), 1);
        assert_eq!(data.count_followers(author.id).await.unwrap(), 1);

        let feed = data
            .list_posts(PostFilter::FollowedBy(reader.id), 0, 10)
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].text, "followed");

        assert!(data.unfollow(reader.id, author.id).await.unwrap());
        assert!(!data.unfollow(reader.id, author.id).await.unwrap());
        assert_eq!(data.count_following(reader.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_posts_are_listed_newest_first() {
        let data = MemoryData::new();
        let author = data.create_user(&new_user("auth")).await.unwrap().unwrap();
        for n in 0..13 {
            data.create_post(&NewPost {
                text: &format!("post {n}"),
                image: None,
                author_id: author.id,
                group_id: None,
            })
            .await
            .unwrap();
        }

        let first = data.list_posts(PostFilter::All, 0, 10).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].text, "post 12");

        let rest = data.list_posts(PostFilter::All, 10, 10).await.unwrap();
        assert_eq!(rest.len(), 3);
        assert_eq!(rest[2].text, "post 0");
    }

    #[tokio::test]
    async fn test_find_post_checks_author() {
        let data = MemoryData::new();
        let author = data.create_user(&new_user("auth")).await.unwrap().unwrap();
        let post = data
            .create_post(&NewPost {
                text: "text",
                image: None,
                author_id: author.id,
                group_id: None,
            })
            .await
            .unwrap();

        assert!(data.find_post("auth", post.id).await.unwrap().is_some());
        assert!(data.find_post("someone", post.id).await.unwrap().is_none());
    }
}
