use actix_web::{web, HttpResponse};

use super::{paginate, PageQuery};
use crate::{
    http::{Actor, Error},
    schema::PostFilter,
    App,
};

#[tracing::instrument(skip_all, name = "http.groups.posts")]
pub async fn group_posts(
    app: web::Data<App>,
    actor: Actor,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let group = app
        .data
        .find_group_by_slug(&slug)
        .await?
        .ok_or_else(Error::not_found)?;

    let page = paginate(&app, PostFilter::Group(group.id), &query).await?;
    let mut context = app.templates.context(actor.user());
    context.insert("group", &group);
    context.insert("page", &page);
    Ok(app.templates.page("group.html", &context)?)
}
