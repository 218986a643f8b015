use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    web, HttpResponse,
};
use error_stack::Report;
use serde::Deserialize;
use tokio::task::spawn_blocking;

use crate::{
    auth::{password, SESSION_COOKIE},
    http::{util::redirect, Actor, Error, FormData},
    schema::{NewUser, User},
    types::form::{
        users::{INVALID_LOGIN_MESSAGE, USERNAME_TAKEN_MESSAGE},
        FormErrors, LoginForm, SignupForm,
    },
    util::Sensitive,
    App,
};

/// Signs `user` in and sends them to `location`.
fn sign_in(app: &App, user: &User, location: &str) -> Result<HttpResponse, Error> {
    let token = app.sessions.issue(user.id)?;
    let max_age = i64::try_from(app.sessions.max_age().as_secs()).unwrap_or(i64::MAX);
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age))
        .finish();

    let mut response = redirect(location);
    response
        .add_cookie(&cookie)
        .map_err(Report::new)?;

    tracing::info!(user.id = %user.id, "signed in");
    Ok(response)
}

fn render_signup(app: &App, actor: &Actor, form: &SignupForm) -> Result<HttpResponse, Error> {
    let mut context = app.templates.context(actor.user());
    context.insert("form", form);
    Ok(app.templates.page("auth/signup.html", &context)?)
}

pub async fn signup_form(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    render_signup(&app, &actor, &SignupForm::default())
}

#[tracing::instrument(skip_all, name = "http.auth.signup")]
pub async fn signup(
    app: web::Data<App>,
    actor: Actor,
    data: FormData,
) -> Result<HttpResponse, Error> {
    let mut form = SignupForm {
        first_name: data.get("first_name").trim().to_string(),
        last_name: data.get("last_name").trim().to_string(),
        username: data.get("username").trim().to_string(),
        email: data.get("email").trim().to_string(),
        password1: Sensitive::new(data.get("password1").to_string()),
        password2: Sensitive::new(data.get("password2").to_string()),
        errors: FormErrors::new(),
    };

    if form.check()
        && app
            .data
            .find_user_by_username(&form.username)
            .await?
            .is_some()
    {
        form.errors.add("username", USERNAME_TAKEN_MESSAGE);
    }
    if !form.errors.is_empty() {
        return render_signup(&app, &actor, &form);
    }

    let password = form.password1.clone();
    let password_hash = spawn_blocking(move || password::hash(password.as_str()))
        .await
        .map_err(Report::new)??;

    let user = app
        .data
        .create_user(&NewUser {
            username: &form.username,
            first_name: &form.first_name,
            last_name: &form.last_name,
            email: form.email(),
            password_hash: &password_hash,
        })
        .await?;

    let Some(user) = user else {
        // someone else took the username in the meantime
        form.errors.add("username", USERNAME_TAKEN_MESSAGE);
        return render_signup(&app, &actor, &form);
    };

    tracing::info!(user.id = %user.id, "created account");
    sign_in(&app, &user, "/")
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

fn render_login(app: &App, actor: &Actor, form: &LoginForm) -> Result<HttpResponse, Error> {
    let mut context = app.templates.context(actor.user());
    context.insert("form", form);
    Ok(app.templates.page("auth/login.html", &context)?)
}

pub async fn login_form(
    app: web::Data<App>,
    actor: Actor,
    query: web::Query<NextQuery>,
) -> Result<HttpResponse, Error> {
    let form = LoginForm {
        next: query.into_inner().next.unwrap_or_default(),
        ..Default::default()
    };
    render_login(&app, &actor, &form)
}

#[tracing::instrument(skip_all, name = "http.auth.login")]
pub async fn login(
    app: web::Data<App>,
    actor: Actor,
    data: FormData,
) -> Result<HttpResponse, Error> {
    let mut form = LoginForm {
        username: data.get("username").trim().to_string(),
        password: Sensitive::new(data.get("password").to_string()),
        next: data.get("next").to_string(),
        errors: FormErrors::new(),
    };
    if !form.check() {
        return render_login(&app, &actor, &form);
    }

    let user = app.data.find_user_by_username(&form.username).await?;
    let verified = match &user {
        Some(user) => {
            let password = form.password.clone();
            let hash = user.password_hash.clone();
            spawn_blocking(move || password::verify(password.as_str().as_bytes(), &hash))
                .await
                .map_err(Report::new)??
        }
        None => false,
    };

    match user {
        Some(user) if verified => sign_in(&app, &user, form.redirect_to()),
        _ => {
            form.errors.add(FormErrors::NON_FIELD, INVALID_LOGIN_MESSAGE);
            render_login(&app, &actor, &form)
        }
    }
}

/// Drops the session cookie. Works for anonymous users too.
#[tracing::instrument(skip_all, name = "http.auth.logout")]
pub async fn logout(app: web::Data<App>) -> Result<HttpResponse, Error> {
    let context = app.templates.context(None);
    let mut response = app.templates.page("auth/logged_out.html", &context)?;

    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    response
        .add_cookie(&cookie)
        .map_err(Report::new)?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use actix_web::http::{header, StatusCode};
    use actix_web::test::{self, TestRequest};

    use crate::{
        auth::SESSION_COOKIE,
        test_utils::{self, init_service, users},
        types::form::users::{INVALID_LOGIN_MESSAGE, USERNAME_TAKEN_MESSAGE},
        App,
    };

    fn session_token<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
        res.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
    }

    #[actix_web::test]
    async fn test_signup_signs_user_in() {
        let app = App::new_for_tests();
        let service = init_service!(app.clone());

        let req = TestRequest::post()
            .uri("/auth/signup/")
            .set_form([
                ("first_name", "Лев"),
                ("last_name", "Толстой"),
                ("username", "leo"),
                ("email", "leo@example.com"),
                ("password1", "war and peace"),
                ("password2", "war and peace"),
            ])
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(test_utils::location(&res), "/");

        let user = app.data.find_user_by_username("leo").await.unwrap().unwrap();
        assert_eq!(user.full_name(), "Лев Толстой");
        assert_eq!(user.email.as_deref(), Some("leo@example.com"));

        let token = session_token(&res).expect("no session cookie");
        assert_eq!(app.sessions.verify(&token), Some(user.id));
    }

    #[actix_web::test]
    async fn test_signup_rejects_taken_username() {
        let app = App::new_for_tests();
        users::register(&app, "leo").await;
        let service = init_service!(app.clone());

        let req = TestRequest::post()
            .uri("/auth/signup/")
            .set_form([
                ("username", "leo"),
                ("password1", "war and peace"),
                ("password2", "war and peace"),
            ])
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(session_token(&res).is_none());

        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains(USERNAME_TAKEN_MESSAGE));
    }

    #[actix_web::test]
    async fn test_login_redirects_to_next() {
        let app = App::new_for_tests();
        let user = users::register_with_password(&app, "leo", "war and peace").await;
        let service = init_service!(app.clone());

        let req = TestRequest::get()
            .uri("/auth/login/?next=/new/")
            .to_request();
        let body = test::call_and_read_body(&service, req).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("name=\"next\""));

        let req = TestRequest::post()
            .uri("/auth/login/")
            .set_form([
                ("username", "leo"),
                ("password", "war and peace"),
                ("next", "/new/"),
            ])
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(test_utils::location(&res), "/new/");

        let token = session_token(&res).expect("no session cookie");
        assert_eq!(app.sessions.verify(&token), Some(user.id));
    }

    #[actix_web::test]
    async fn test_login_with_wrong_password() {
        let app = App::new_for_tests();
        users::register_with_password(&app, "leo", "war and peace").await;
        let service = init_service!(app.clone());

        for (username, password) in [("leo", "anna karenina"), ("nobody", "war and peace")] {
            let req = TestRequest::post()
                .uri("/auth/login/")
                .set_form([("username", username), ("password", password)])
                .to_request();
            let res = test::call_service(&service, req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert!(session_token(&res).is_none());

            let body = test::read_body(res).await;
            let body = std::str::from_utf8(&body).unwrap();
            assert!(body.contains(INVALID_LOGIN_MESSAGE));
        }
    }

    #[actix_web::test]
    async fn test_logout_removes_cookie() {
        let app = App::new_for_tests();
        let user = users::register(&app, "leo").await;
        let service = init_service!(app.clone());

        let req = TestRequest::get()
            .uri("/auth/logout/")
            .cookie(test_utils::session_cookie(&app, &user))
            .to_request();
        let res = test::call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let set_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=;")));

        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("You have been logged out"));
        assert!(!body.contains("href=\"/leo/\""));
    }
}
