use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::fmt::Display;

use super::{count_to_u64, Author, GroupRef};
use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{GroupId, PostId, UserId},
};

#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub text: String,
    /// Storage name of the attached image, e.g. `posts/small.gif`.
    pub image: Option<String>,
    pub author_id: UserId,
    pub group_id: Option<GroupId>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    const PREVIEW_CHARS: usize = 15;
}

/// Shows the first 15 characters of the post text.
impl Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let end = self
            .text
            .char_indices()
            .nth(Self::PREVIEW_CHARS)
            .map_or(self.text.len(), |(idx, _)| idx);

        f.write_str(&self.text[..end])
    }
}

/// A post together with everything a page needs to render it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostView {
    pub id: PostId,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: Author,
    pub group: Option<GroupRef>,
    pub comments_count: u64,
}

#[derive(FromRow)]
struct PostRow {
    id: PostId,
    text: String,
    image: Option<String>,
    created_at: DateTime<Utc>,
    author_id: UserId,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
    group_id: Option<GroupId>,
    group_title: Option<String>,
    group_slug: Option<String>,
    comments_count: i64,
}

impl From<PostRow> for PostView {
    fn from(row: PostRow) -> Self {
        let group = match (row.group_id, row.group_title, row.group_slug) {
            (Some(id), Some(title), Some(slug)) => Some(GroupRef { id, title, slug }),
            _ => None,
        };

        Self {
            id: row.id,
            text: row.text,
            image: row.image,
            created_at: row.created_at,
            author: Author::new(
                row.author_id,
                row.author_username,
                &row.author_first_name,
                &row.author_last_name,
            ),
            group,
            comments_count: count_to_u64(row.comments_count),
        }
    }
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Group(GroupId),
    Author(UserId),
    /// Posts of every author the user follows.
    FollowedBy(UserId),
}

impl PostFilter {
    fn push_where(self, query: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::All => {}
            Self::Group(id) => {
                query.push(" WHERE p.group_id = ").push_bind(id);
            }
            Self::Author(id) => {
                query.push(" WHERE p.author_id = ").push_bind(id);
            }
            Self::FollowedBy(id) => {
                query
                    .push(" WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = ")
                    .push_bind(id)
                    .push(")");
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewPost<'a> {
    pub text: &'a str,
    pub image: Option<&'a str>,
    pub author_id: UserId,
    pub group_id: Option<GroupId>,
}

/// Replacement values of an edited post.
#[derive(Debug, Clone, Copy)]
pub struct PostChanges<'a> {
    pub text: &'a str,
    pub image: Option<&'a str>,
    pub group_id: Option<GroupId>,
}

const VIEW_SELECT: &str = r#"SELECT p.id, p.text, p.image, p.created_at,
    u.id AS author_id, u.username AS author_username,
    u.first_name AS author_first_name, u.last_name AS author_last_name,
    g.id AS group_id, g.title AS group_title, g.slug AS group_slug,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count
FROM posts p
JOIN "users" u ON u.id = p.author_id
LEFT JOIN "groups" g ON g.id = p.group_id"#;

impl Post {
    #[tracing::instrument(skip_all, name = "db.posts.insert")]
    pub async fn insert(conn: &mut Connection, post: &NewPost<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO posts (text, image, author_id, group_id)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(post.text)
        .bind(post.image)
        .bind(post.author_id)
        .bind(post.group_id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn, changes), name = "db.posts.update")]
    pub async fn update(
        conn: &mut Connection,
        id: PostId,
        changes: &PostChanges<'_>,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"UPDATE posts SET text = $2, image = $3, group_id = $4
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(changes.text)
        .bind(changes.image)
        .bind(changes.group_id)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    /// Looks up a post by its id, as long as it was written
    /// by the user named `author`.
    #[tracing::instrument(skip(conn), name = "db.posts.find_view")]
    pub async fn find_view(
        conn: &mut Connection,
        author: &str,
        id: PostId,
    ) -> Result<Option<PostView>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "{VIEW_SELECT} WHERE p.id = $1 AND u.username = $2"
        ))
        .bind(id)
        .bind(author)
        .fetch_optional(conn)
        .await
        .into_db_error()?;

        Ok(row.map(PostView::from))
    }

    #[tracing::instrument(skip(conn), name = "db.posts.count")]
    pub async fn count(conn: &mut Connection, filter: PostFilter) -> Result<u64> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM posts p");
        filter.push_where(&mut query);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(conn)
            .await
            .into_db_error()?;

        Ok(count_to_u64(count))
    }

    /// Lists posts newest first.
    #[tracing::instrument(skip(conn), name = "db.posts.list")]
    pub async fn list(
        conn: &mut Connection,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostView>> {
        let mut query = QueryBuilder::<Postgres>::new(VIEW_SELECT);
        filter.push_where(&mut query);
        query
            .push(" ORDER BY p.created_at DESC, p.id DESC LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows = query
            .build_query_as::<PostRow>()
            .fetch_all(conn)
            .await
            .into_db_error()?;

        Ok(rows.into_iter().map(PostView::from).collect())
    }
}
