use serde::Serialize;
use sqlx::FromRow;
use std::fmt::Display;

use crate::{
    database::{Connection, ErrorExt, Result},
    types::id::GroupId,
};

/// A community posts can be filed under.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Just enough of a group to link to it from a post.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupRef {
    pub id: GroupId,
    pub title: String,
    pub slug: String,
}

impl From<&Group> for GroupRef {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            title: group.title.clone(),
            slug: group.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewGroup<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

impl Group {
    /// Inserts a new group, returning `None` if the slug is taken.
    #[tracing::instrument(skip(conn), name = "db.groups.insert")]
    pub async fn insert(conn: &mut Connection, group: &NewGroup<'_>) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"INSERT INTO "groups" (title, slug, description)
               VALUES ($1, $2, $3)
               ON CONFLICT (slug) DO NOTHING
               RETURNING *"#,
        )
        .bind(group.title)
        .bind(group.slug)
        .bind(group.description)
        .fetch_optional(conn)
        .await
        .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "db.groups.by_slug")]
    pub async fn by_slug(conn: &mut Connection, slug: &str) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "groups" WHERE slug = $1"#)
            .bind(slug)
            .fetch_optional(conn)
            .await
            .into_db_error()
    }

    #[tracing::instrument(skip(conn), name = "db.groups.list")]
    pub async fn list(conn: &mut Connection) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(r#"SELECT * FROM "groups" ORDER BY title, id"#)
            .fetch_all(conn)
            .await
            .into_db_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_title() {
        let group = Group {
            id: GroupId::new(1),
            title: "Тестовая группа".into(),
            slug: "test-slug".into(),
            description: "Тестовое описание".into(),
        };
        assert_eq!(group.to_string(), "Тестовая группа");
    }
}
