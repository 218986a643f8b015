use actix_web::HttpResponse;
use error_stack::{Result, ResultExt};
use std::collections::HashMap;
use tera::{Context, Tera, Value};
use thiserror::Error;

use crate::schema::User;

macro_rules! templates {
    ($( $name:literal, )*) => {
        &[$( ($name, include_str!(concat!("../../templates/", $name))), )*]
    };
}

const TEMPLATES: &[(&str, &str)] = templates![
    "base.html",
    "includes/comments.html",
    "includes/paginator.html",
    "includes/post_item.html",
    "about/author.html",
    "about/tech.html",
    "auth/logged_out.html",
    "auth/login.html",
    "auth/signup.html",
    "comments.html",
    "follow.html",
    "group.html",
    "index.html",
    "misc/404.html",
    "misc/500.html",
    "new_post.html",
    "post.html",
    "profile.html",
];

#[derive(Debug, Error)]
#[error("Failed to render template")]
pub struct RenderError;

/// HTML templates compiled into the binary.
#[derive(Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .change_context(RenderError)?;

        tera.register_filter("linebreaksbr", linebreaksbr);
        Ok(Self { tera })
    }

    /// Context every page starts from. `user` is unset for
    /// anonymous requests.
    #[must_use]
    pub fn context(&self, user: Option<&User>) -> Context {
        let mut context = Context::new();
        if let Some(user) = user {
            context.insert("user", user);
        }
        context
    }

    #[tracing::instrument(skip(self, context), name = "templates.render")]
    pub fn render(&self, name: &str, context: &Context) -> Result<String, RenderError> {
        self.tera
            .render(name, context)
            .change_context(RenderError)
            .attach_printable_lazy(|| format!("template: {name}"))
    }

    /// Renders `name` into a `200 OK` HTML response.
    pub fn page(&self, name: &str, context: &Context) -> Result<HttpResponse, RenderError> {
        self.render(name, context).map(html)
    }
}

pub fn html(body: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_HTML_UTF_8)
        .body(body.into())
}

/// Escapes the text and turns its line breaks into `<br>`.
fn linebreaksbr(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("linebreaksbr", "value", String, value);
    let escaped = tera::escape_html(&text.replace("\r\n", "\n"));
    Ok(Value::String(escaped.replace('\n', "<br>")))
}
