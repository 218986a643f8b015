use serde::Serialize;
use sqlx::FromRow;

use super::count_to_u64;
use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::{FollowId, UserId},
};

/// Subscription of `user_id` to the posts of `author_id`.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct Follow {
    pub id: FollowId,
    pub user_id: UserId,
    pub author_id: UserId,
}

impl Follow {
    /// Returns `false` if the user already follows the author.
    #[tracing::instrument(skip(conn), name = "db.follows.follow")]
    pub async fn follow(conn: &mut Connection, user_id: UserId, author_id: UserId) -> Result<bool> {
        let result = sqlx::query(
            r#"INSERT INTO follows (user_id, author_id)
               VALUES ($1, $2)
               ON CONFLICT (user_id, author_id) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(conn)
        .await
        .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns `false` if the user did not follow the author.
    #[tracing::instrument(skip(conn), name = "db.follows.unfollow")]
    pub async fn unfollow(
        conn: &mut Connection,
        user_id: UserId,
        author_id: UserId,
    ) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM follows WHERE user_id = $1 AND author_id = $2"#)
            .bind(user_id)
            .bind(author_id)
            .execute(conn)
            .await
            .into_db_error()?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(conn), name = "db.follows.exists")]
    pub async fn exists(conn: &mut Connection, user_id: UserId, author_id: UserId) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)"#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(conn)
        .await
        .into_db_error()
    }

    /// Number of users following `author_id`.
    #[tracing::instrument(skip(conn), name = "db.follows.count_followers")]
    pub async fn count_followers(conn: &mut Connection, author_id: UserId) -> Result<u64> {
        let count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM follows WHERE author_id = $1"#)
                .bind(author_id)
                .fetch_one(conn)
                .await
                .into_db_error()?;

        Ok(count_to_u64(count))
    }

    /// Number of authors `user_id` follows.
    #[tracing::instrument(skip(conn), name = "db.follows.count_following")]
    pub async fn count_following(conn: &mut Connection, user_id: UserId) -> Result<u64> {
        let count =
            sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM follows WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_one(conn)
                .await
                .into_db_error()?;

        Ok(count_to_u64(count))
    }
}
