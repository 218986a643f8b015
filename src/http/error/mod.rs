use error_stack::{Context, Report};
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::types;

mod impls;
mod pages;

pub use pages::pages;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failed request ends up as this error. Its [type](types::Error)
/// decides what the requester sees, the report and span trace only
/// go to the logs.
pub struct Error {
    error_type: types::Error,
    report: Report<RequestError>,
    trace: SpanTrace,
}

#[derive(Debug, Error)]
#[error("Failed to handle request")]
pub struct RequestError;

#[derive(Debug, Error)]
#[error("Requested resource does not exist")]
struct ResourceNotFound;

#[derive(Debug, Error)]
#[error("Attempt to access user-only route")]
struct LoginRequired;

impl Error {
    #[must_use]
    pub fn from_context(error_type: types::Error, context: impl Context) -> Self {
        Self::from_report(error_type, Report::new(context))
    }

    #[must_use]
    pub fn from_report(error_type: types::Error, report: Report<impl Context>) -> Self {
        Self {
            error_type,
            report: report.change_context(RequestError),
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::from_context(types::Error::NotFound, ResourceNotFound)
    }

    /// The requester has to sign in first and come back to `next`.
    #[must_use]
    pub fn login_required(next: impl Into<String>) -> Self {
        Self::from_context(
            types::Error::LoginRequired { next: next.into() },
            LoginRequired,
        )
    }
}

impl Error {
    #[must_use]
    pub fn as_type(&self) -> &types::Error {
        &self.error_type
    }

    #[must_use]
    pub fn attach_printable(
        mut self,
        attachment: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    ) -> Self {
        self.report = self.report.attach_printable(attachment);
        self
    }

    #[must_use]
    pub fn downcast_ref<F: Context>(&self) -> Option<&F> {
        self.report.downcast_ref::<F>()
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("type", &self.error_type)
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", &self.error_type)?;
        writeln!(f, "{:?}", self.report)?;
        std::fmt::Display::fmt(&self.trace, f)
    }
}
