use actix_web::{web, HttpResponse};

use super::posts::find_post;
use crate::{
    http::{
        util::{post_url, redirect},
        Error, FormData, SessionUser,
    },
    schema::{NewComment, PostView, User},
    types::form::CommentForm,
    App,
};

async fn render_form(
    app: &App,
    user: &User,
    post: &PostView,
    form: &CommentForm,
) -> Result<HttpResponse, Error> {
    let comments = app.data.list_comments(post.id).await?;

    let mut context = app.templates.context(Some(user));
    context.insert("author", &post.author);
    context.insert("post", post);
    context.insert("form", form);
    context.insert("comments", &comments);
    Ok(app.templates.page("comments.html", &context)?)
}

#[tracing::instrument(skip_all, name = "http.comments.form")]
pub async fn comment_form(
    app: web::Data<App>,
    user: SessionUser,
    path: web::Path<(String, u64)>,
) -> Result<HttpResponse, Error> {
    let (username, post_id) = path.into_inner();
    let post = find_post(&app, &username, post_id).await?;
    render_form(&app, &user, &post, &CommentForm::default()).await
}

#[tracing::instrument(skip_all, name = "http.comments.add")]
pub async fn add_comment(
    app: web::Data<App>,
    user: SessionUser,
    path: web::Path<(String, u64)>,
    data: FormData,
) -> Result<HttpResponse, Error> {
    let (username, post_id) = path.into_inner();
    let post = find_post(&app, &username, post_id).await?;

    let mut form = CommentForm {
        text: data.get("text").to_string(),
        ..Default::default()
    };
    if !form.check() {
        return render_form(&app, &user, &post, &form).await;
    }

    app.data
        .create_comment(&NewComment {
            post_id: post.id,
            author_id: user.id,
            text: form.text.trim(),
        })
        .await?;

    Ok(redirect(&post_url(&post.author.username, post.id)))
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
    async fn test_signed_in_user_comments() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let reader = users::register(&app, "reader").await;
        let post = test_utils::create_post(&app, &author, "Тестовый пост", None).await;
        let service = init_service!(app.clone());

        let req = TestRequest::post()
            .uri(&format!("/leo/{}/comment/", post.id))
            .cookie(test_utils::session_cookie(&app, &reader))
            .set_form([("text", "Комментарий добавлен")])
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(test_utils::location(&res), format!("/leo/{}/", post.id));

        let comments = app.data.list_comments(post.id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Комментарий добавлен");
        assert_eq!(comments[0].author.id, reader.id);

        let req = TestRequest::get()
            .uri(&format!("/leo/{}/", post.id))
            .to_request();
        let body = test::call_and_read_body(&service, req).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("Комментарий добавлен"));
        assert!(body.contains("Comments (1)"));
    }

    #[actix_web::test]
    async fn test_guest_cannot_comment() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let post = test_utils::create_post(&app, &author, "Тестовый пост", None).await;
        let service = init_service!(app.clone());

        let uri = format!("/leo/{}/comment/", post.id);
        let req = TestRequest::post()
            .uri(&uri)
            .set_form([("text", "Комментарий гостя")])
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            test_utils::location(&res),
            format!("/auth/login/?next=/leo/{}/comment/", post.id)
        );
        assert!(app.data.list_comments(post.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_blank_comment_is_rejected() {
        let app = App::new_for_tests();
        let author = users::register(&app, "leo").await;
        let post = test_utils::create_post(&app, &author, "Тестовый пост", None).await;
        let service = init_service!(app.clone());

        let req = TestRequest::post()
            .uri(&format!("/leo/{}/comment/", post.id))
            .cookie(test_utils::session_cookie(&app, &author))
            .set_form([("text", "  ")])
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains(&format!("Comments on post {}", post.id)));
        assert!(body.contains(crate::types::form::REQUIRED_MESSAGE));
        assert!(app.data.list_comments(post.id).await.unwrap().is_empty());
    }
}
