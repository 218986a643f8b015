use actix_web::{web, HttpResponse};

use super::{paginate, PageQuery};
use crate::{
    http::{Actor, Error},
    schema::{Author, PostFilter},
    App,
};

#[tracing::instrument(skip_all, name = "http.profiles.profile")]
pub async fn profile(
    app: web::Data<App>,
    actor: Actor,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let author = app
        .data
        .find_user_by_username(&username)
        .await?
        .ok_or_else(Error::not_found)?;

    let following = match actor.user() {
        Some(user) => app.data.is_following(user.id, author.id).await?,
        None => false,
    };
    let page = paginate(&app, PostFilter::Author(author.id), &query).await?;
    let followers_count = app.data.count_followers(author.id).await?;
    let following_count = app.data.count_following(author.id).await?;

    let mut context = app.templates.context(actor.user());
    context.insert("author", &Author::from(&author));
    context.insert("following", &following);
    context.insert("post_count", &page.count);
    context.insert("page", &page);
    context.insert("followers_count", &followers_count);
    context.insert("following_count", &following_count);
    Ok(app.templates.page("profile.html", &context)?)
}
