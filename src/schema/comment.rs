use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::Author;
use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{CommentId, PostId, UserId},
};

#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommentView {
    pub id: CommentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

#[derive(FromRow)]
struct CommentRow {
    id: CommentId,
    text: String,
    created_at: DateTime<Utc>,
    author_id: UserId,
    author_username: String,
    author_first_name: String,
    author_last_name: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NewComment<'a> {
    pub post_id: PostId,
    pub author_id: UserId,
    pub text: &'a str,
}

impl Comment {
    #[tracing::instrument(skip_all, name = "db.comments.insert")]
    pub async fn insert(conn: &mut Connection, comment: &NewComment<'_>) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO comments (post_id, author_id, text)
               VALUES ($1, $2, $3)
               RETURNING *"#,
        )
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(comment.text)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Lists the comments of a post, oldest first.
    #[tracing::instrument(skip(conn), name = "db.comments.list_for_post")]
    pub async fn list_for_post(conn: &mut Connection, post_id: PostId) -> Result<Vec<CommentView>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"SELECT c.id, c.text, c.created_at,
                      u.id AS author_id, u.username AS author_username,
                      u.first_name AS author_first_name, u.last_name AS author_last_name
               FROM comments c
               JOIN "users" u ON u.id = c.author_id
               WHERE c.post_id = $1
               ORDER BY c.created_at, c.id"#,
        )
        .bind(post_id)
        .fetch_all(conn)
        .await
        .into_db_error()?;

        Ok(rows
            .into_iter()
            .map(|row| CommentView {
                id: row.id,
                text: row.text,
                created_at: row.created_at,
                author: Author::new(
                    row.author_id,
                    row.author_username,
                    &row.author_first_name,
                    &row.author_last_name,
                ),
            })
            .collect())
    }
}
