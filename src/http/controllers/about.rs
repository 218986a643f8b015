use actix_web::{web, HttpResponse};

use crate::{
    http::{Actor, Error},
    App,
};

pub async fn author(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let context = app.templates.context(actor.user());
    Ok(app.templates.page("about/author.html", &context)?)
}

pub async fn tech(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let context = app.templates.context(actor.user());
    Ok(app.templates.page("about/tech.html", &context)?)
}
