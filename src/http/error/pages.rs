use actix_web::{
    dev::ServiceResponse,
    http::{header, StatusCode},
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    web, HttpMessage,
};

use crate::{http::Actor, App};

/// Replaces the bodies of 404 and 500 responses with the
/// `misc/404.html` and `misc/500.html` pages.
pub fn pages<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, server_error)
}

fn not_found<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    Ok(render(res, "misc/404.html"))
}

fn server_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    Ok(render(res, "misc/500.html"))
}

fn render<B>(res: ServiceResponse<B>, template: &str) -> ErrorHandlerResponse<B> {
    let Some(app) = res.request().app_data::<web::Data<App>>().cloned() else {
        return ErrorHandlerResponse::Response(res.map_into_left_body());
    };

    let actor = res
        .request()
        .extensions()
        .get::<Actor>()
        .cloned()
        .unwrap_or(Actor::Anonymous);

    let mut context = app.templates.context(actor.user());
    context.insert("path", res.request().path());

    match app.templates.render(template, &context) {
        Ok(body) => {
            let (req, res) = res.into_parts();
            let mut res = res.set_body(body).map_into_boxed_body();
            res.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("text/html; charset=utf-8"),
            );
            ErrorHandlerResponse::Response(ServiceResponse::new(req, res).map_into_right_body())
        }
        Err(report) => {
            tracing::error!(?report, "could not render error page");
            ErrorHandlerResponse::Response(res.map_into_left_body())
        }
    }
}
