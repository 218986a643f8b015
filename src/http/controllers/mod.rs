use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{Actor, Error};
use crate::{
    schema::{PostFilter, PostView},
    types::{Page, Paginator},
    App,
};

mod about;
mod auth;
mod comments;
mod follows;
mod groups;
mod media;
mod posts;
mod profiles;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .service(
            web::resource("/new/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::new_post)),
        )
        .route("/group/{slug}/", web::get().to(groups::group_posts))
        .route("/follow/", web::get().to(follows::follow_index))
        .route("/about/author/", web::get().to(about::author))
        .route("/about/tech/", web::get().to(about::tech))
        .service(
            web::resource("/auth/signup/")
                .route(web::get().to(auth::signup_form))
                .route(web::post().to(auth::signup)),
        )
        .service(
            web::resource("/auth/login/")
                .route(web::get().to(auth::login_form))
                .route(web::post().to(auth::login)),
        )
        .service(
            web::resource("/auth/logout/")
                .route(web::get().to(auth::logout))
                .route(web::post().to(auth::logout)),
        )
        .route("/media/{name:.+}", web::get().to(media::serve))
        .route("/{username}/", web::get().to(profiles::profile))
        .service(
            web::resource("/{username}/follow/")
                .route(web::get().to(follows::profile_follow))
                .route(web::post().to(follows::profile_follow)),
        )
        .service(
            web::resource("/{username}/unfollow/")
                .route(web::get().to(follows::profile_unfollow))
                .route(web::post().to(follows::profile_unfollow)),
        )
        .route("/{username}/{post_id}/", web::get().to(posts::post_view))
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        )
        .service(
            web::resource("/{username}/{post_id}/comment/")
                .route(web::get().to(comments::comment_form))
                .route(web::post().to(comments::add_comment)),
        );
}

/// Fallback for every unknown route.
pub async fn not_found(_actor: Actor) -> Result<HttpResponse, Error> {
    Err(Error::not_found())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageQuery {
    pub page: Option<String>,
}

/// Loads the requested page of posts matching `filter`.
pub(crate) async fn paginate(
    app: &App,
    filter: PostFilter,
    query: &PageQuery,
) -> Result<Page<PostView>, Error> {
    let count = app.data.count_posts(filter).await?;
    let window = Paginator::default().window(query.page.as_deref(), count);
    let posts = app
        .data
        .list_posts(filter, window.offset(), window.limit())
        .await?;

    Ok(window.into_page(posts))
}
