use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::UserId,
};

#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// First and last name joined together, empty if the user
    /// never filled them in.
    #[must_use]
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}").trim().to_string()
}

/// Public face of a user as shown next to posts, comments
/// and on profile pages.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    /// Full name, or the username if the user has no name set.
    pub display_name: String,
}

impl Author {
    #[must_use]
    pub fn new(id: UserId, username: String, first_name: &str, last_name: &str) -> Self {
        let full_name = full_name(first_name, last_name);
        let display_name = if full_name.is_empty() {
            username.clone()
        } else {
            full_name.clone()
        };
        Self {
            id,
            username,
            full_name,
            display_name,
        }
    }
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), &user.first_name, &user.last_name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub password_hash: &'a str,
}

impl User {
    /// Inserts a new user, returning `None` if the username
    /// is already taken.
    #[tracing::instrument(skip_all, name = "db.users.insert")]
    pub async fn insert(conn: &mut Connection, user: &NewUser<'_>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "users" (username, first_name, last_name, email, password_hash)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (username) DO NOTHING
               RETURNING *"#,
        )
        .bind(user.username)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "db.users.by_id")]
    pub async fn by_id(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = $1"#)
            .bind(id)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "db.users.by_username")]
    pub async fn by_username(conn: &mut Connection, username: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE username = $1"#)
            .bind(username)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }
}
