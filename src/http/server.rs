use actix_web::HttpServer;
use error_stack::{Result, ResultExt};
use thiserror::Error;

use super::http_app;
use crate::App;

#[derive(Debug, Error)]
#[error("Failed to start HTTP server")]
pub struct StartServerError;

/// Serves yatube until the server is told to shut down.
pub async fn run(app: App) -> Result<(), StartServerError> {
    let config = app.config.clone();
    tracing::info!(ip = %config.ip, port = config.port, workers = config.workers.get(), "starting HTTP server");

    HttpServer::new(move || http_app!(app.clone()))
        .workers(config.workers.get())
        .bind((config.ip, config.port))
        .change_context(StartServerError)
        .attach_printable_lazy(|| format!("could not bind to {}:{}", config.ip, config.port))?
        .run()
        .await
        .change_context(StartServerError)
}
