use actix_web::{http::header, web, HttpResponse};

use crate::{
    http::Error,
    storage::{ImageKind, StorageError},
    App,
};

/// Serves an uploaded image.
#[tracing::instrument(skip(app), name = "http.media.serve")]
pub async fn serve(app: web::Data<App>, name: web::Path<String>) -> Result<HttpResponse, Error> {
    let content = match app.storage.open(&name).await {
        Ok(Some(content)) => content,
        Ok(None) => return Err(Error::not_found()),
        Err(report) if matches!(report.current_context(), StorageError::InvalidName) => {
            return Err(Error::not_found());
        }
        Err(report) => return Err(report.into()),
    };

    let content_type = ImageKind::sniff(&content)
        .map_or("application/octet-stream", ImageKind::content_type);

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(content))
}
