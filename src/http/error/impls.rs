use actix_web::{
    body::BoxBody,
    http::{header, StatusCode},
    HttpResponse,
};
use error_stack::{Context, Report};

use super::Error;
use crate::{database, http::util::login_url, types::Error as ErrorType};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::BadRequest => StatusCode::BAD_REQUEST,
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::LoginRequired { .. } => StatusCode::FOUND,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match &self.error_type {
            ErrorType::LoginRequired { next } => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, login_url(next)))
                    .finish();
            }
            ErrorType::Internal | ErrorType::ReadonlyMode => {
                tracing::error!(report = ?self.report, trace = %self.trace, "{}", self.error_type);
            }
            ErrorType::BadRequest | ErrorType::NotFound => {
                tracing::debug!(report = ?self.report, "{}", self.error_type);
            }
        }

        HttpResponse::build(self.status_code())
            .content_type(mime::TEXT_PLAIN_UTF_8)
            .body(self.error_type.to_string())
    }
}

/// Any report that bubbles up to a handler is an internal error,
/// unless the database refused to write.
impl<C: Context> From<Report<C>> for Error {
    fn from(report: Report<C>) -> Self {
        let readonly = report
            .downcast_ref::<database::Error>()
            .is_some_and(|e| matches!(e, database::Error::Readonly));

        let error_type = if readonly {
            ErrorType::ReadonlyMode
        } else {
            ErrorType::Internal
        };
        Error::from_report(error_type, report)
    }
}
