use actix_web::cookie::Cookie;
use actix_web::http::header;

use crate::{
    auth::SESSION_COOKIE,
    schema::{Group, NewGroup, NewPost, Post, User},
    App,
};

pub mod users;

/// A valid 2x1 pixel GIF image.
pub const SMALL_GIF: &[u8] = b"\x47\x49\x46\x38\x39\x61\x02\x00\x01\x00\x80\x00\x00\x00\x00\x00\xFF\xFF\xFF\x21\xF9\x04\x00\x00\x00\x00\x00\x2C\x00\x00\x00\x00\x02\x00\x01\x00\x00\x02\x02\x0C\x0A\x00\x3B";

const BOUNDARY: &str = "yatube-test-boundary";

/// Builds an [`actix_web::test`] service out of an [`App`].
macro_rules! init_service {
    ($app:expr) => {
        actix_web::test::init_service($crate::http::http_app!($app)).await
    };
}
pub(crate) use init_service;

#[tracing::instrument(skip(app), name = "test_utils.create_group")]
pub async fn create_group(app: &App, slug: &str) -> Group {
    let title = format!("Group {slug}");
    app.data
        .create_group(&NewGroup {
            title: &title,
            slug,
            description: "Test group description",
        })
        .await
        .unwrap()
        .expect("slug is already taken")
}

#[tracing::instrument(skip(app, author, group), name = "test_utils.create_post")]
pub async fn create_post(app: &App, author: &User, text: &str, group: Option<&Group>) -> Post {
    app.data
        .create_post(&NewPost {
            text,
            image: None,
            author_id: author.id,
            group_id: group.map(|g| g.id),
        })
        .await
        .unwrap()
}

/// Cookie carrying a valid session of `user`.
pub fn session_cookie(app: &App, user: &User) -> Cookie<'static> {
    let token = app.sessions.issue(user.id).unwrap();
    Cookie::new(SESSION_COOKIE, token)
}

/// Encodes `fields` and an optional `(field, file name, content)`
/// upload as a `multipart/form-data` body.
pub fn multipart(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> ((header::HeaderName, String), Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((name, file_name, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    ((header::CONTENT_TYPE, content_type), body)
}

/// Path of a `302 Found` response.
pub fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("response has no Location header")
}
