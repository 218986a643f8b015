use actix_web::{web, HttpResponse};

use super::{paginate, PageQuery};
use crate::{
    http::{util::redirect, Error, SessionUser},
    schema::{PostFilter, User},
    App,
};

const FOLLOW_INDEX: &str = "/follow/";

/// Posts of every author the user follows.
#[tracing::instrument(skip_all, name = "http.follows.index")]
pub async fn follow_index(
    app: web::Data<App>,
    user: SessionUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let page = paginate(&app, PostFilter::FollowedBy(user.id), &query).await?;

    let mut context = app.templates.context(Some(&*user));
    context.insert("page", &page);
    context.insert("follow", &true);
    Ok(app.templates.page("follow.html", &context)?)
}

async fn find_author(app: &App, username: &str) -> Result<User, Error> {
    app.data
        .find_user_by_username(username)
        .await?
        .ok_or_else(Error::not_found)
}

#[tracing::instrument(skip_all, name = "http.follows.follow")]
pub async fn profile_follow(
    app: web::Data<App>,
    user: SessionUser,
    username: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let author = find_author(&app, &username).await?;
    if author.id == user.id {
        return Ok(redirect("/"));
    }

    if app.data.follow(user.id, author.id).await? {
        tracing::debug!(author.id = %author.id, "followed author");
    }
    Ok(redirect(FOLLOW_INDEX))
}

#[tracing::instrument(skip_all, name = "http.follows.unfollow")]
pub async fn profile_unfollow(
    app: web::Data<App>,
    user: SessionUser,
    username: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let author = find_author(&app, &username).await?;
    if !app.data.unfollow(user.id, author.id).await? {
        return Err(Error::not_found());
    }
    Ok(redirect(FOLLOW_INDEX))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};

    use crate::{
        test_utils::{self, init_service, users},
        App,
    };

    #[actix_web::test]
    async fn test_follow_and_unfollow() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let reader = users::register(&app, "reader").await;
        let service = init_service!(app.clone());
        assert_eq!(app.data.count_followers(author.id).await.unwrap(), 0);

        for _ in 0..2 {
            let req = TestRequest::get()
                .uri("/leo/follow/")
                .cookie(test_utils::session_cookie(&app, &reader))
                .to_request();
            let res = test::call_service(&service, req).await;
            assert_eq!(res.status(), StatusCode::FOUND);
            assert_eq!(test_utils::location(&res), "/follow/");
        }
        assert_eq!(app.data.count_followers(author.id).await.unwrap(), 1);
        assert!(app.data.is_following(reader.id, author.id).await.unwrap());

        let req = TestRequest::get()
            .uri("/leo/unfollow/")
            .cookie(test_utils::session_cookie(&app, &reader))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(app.data.count_followers(author.id).await.unwrap(), 0);

        // nothing left to unfollow
        let req = TestRequest::get()
            .uri("/leo/unfollow/")
            .cookie(test_utils::session_cookie(&app, &reader))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_cannot_follow_self() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let service = init_service!(app.clone());

        let req = TestRequest::get()
            .uri("/leo/follow/")
            .cookie(test_utils::session_cookie(&app, &author))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(test_utils::location(&res), "/");
        assert_eq!(app.data.count_followers(author.id).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_guest_cannot_follow() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let service = init_service!(app.clone());

        for uri in ["/leo/follow/", "/follow/"] {
            let req = TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&service, req).await;
            assert_eq!(res.status(), StatusCode::FOUND, "{uri}");
            assert_eq!(
                test_utils::location(&res),
                format!("/auth/login/?next={uri}")
            );
        }
        assert_eq!(app.data.count_followers(author.id).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_follow_index_shows_followed_authors_only() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let other = users::register(&app, "other").await;
        let reader = users::register(&app, "reader").await;
        test_utils::create_post(&app, &author, "Пост автора", None).await;
        test_utils::create_post(&app, &other, "Чужой пост", None).await;
        app.data.follow(reader.id, author.id).await.unwrap();

        let service = init_service!(app.clone());
        let req = TestRequest::get()
            .uri("/follow/")
            .cookie(test_utils::session_cookie(&app, &reader))
            .to_request();
        let body = test::call_and_read_body(&service, req).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("Пост автора"));
        assert!(!body.contains("Чужой пост"));

        // the author follows nobody
        let req = TestRequest::get()
            .uri("/follow/")
            .cookie(test_utils::session_cookie(&app, &author))
            .to_request();
        let body = test::call_and_read_body(&service, req).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(!body.contains("Пост автора"));
        assert!(!body.contains("Чужой пост"));
    }

    #[actix_web::test]
    async fn test_profile_shows_follow_counts() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let reader = users::register(&app, "reader").await;
        app.data.follow(reader.id, author.id).await.unwrap();

        let service = init_service!(app.clone());
        let req = TestRequest::get()
            .uri("/leo/")
            .cookie(test_utils::session_cookie(&app, &reader))
            .to_request();
        let body = test::call_and_read_body(&service, req).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("Followers: 1"));
        assert!(body.contains("Following: 0"));
        assert!(body.contains("href=\"/leo/unfollow/\""));
    }
}
